use async_trait::async_trait;
use domain::Order;

use crate::{OrderId, Result};

/// Core trait for order store implementations.
///
/// Orders are inserted through a transaction obtained from
/// [`init_transaction`](OrderStore::init_transaction); every other operation
/// runs on its own. In particular `confirm_order` is never part of the
/// insert transaction. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// The transaction handle returned by `init_transaction`.
    type Transaction: OrderTransaction;

    /// Opens a transaction for inserting orders.
    async fn init_transaction(&self) -> Result<Self::Transaction>;

    /// Moves a stored order from `PENDING` to `CONFIRMED`.
    ///
    /// Fails with `OrderNotFound` for an unknown id and with
    /// `InvalidTransition` if the order is not pending.
    async fn confirm_order(&self, order_id: OrderId) -> Result<()>;

    /// Retrieves an order with its items.
    ///
    /// Returns None if the order does not exist.
    async fn find_order_by_id(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Retrieves all orders with their items, in ascending id order.
    async fn get_all_orders(&self) -> Result<Vec<Order>>;
}

/// An open insert transaction.
///
/// `commit` and `rollback` consume the handle. A handle dropped without
/// either discards everything staged through it.
#[async_trait]
pub trait OrderTransaction: Send + Sized {
    /// Stages the order row and all of its item rows.
    ///
    /// Either every row is staged or none is. Staged rows are not visible to
    /// readers until `commit`. Returns the newly assigned order id.
    async fn save_order(&mut self, order: &Order) -> Result<OrderId>;

    /// Publishes everything staged in this transaction.
    async fn commit(self) -> Result<()>;

    /// Discards everything staged in this transaction.
    async fn rollback(self) -> Result<()>;
}
