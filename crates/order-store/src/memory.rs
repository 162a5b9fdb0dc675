use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::{Order, Payment, PaymentInstruction, PaymentStatus};
use tokio::sync::RwLock;

use crate::{
    OrderId, Result, StoreError,
    payment::PaymentRepository,
    store::{OrderStore, OrderTransaction},
};

#[derive(Debug, Default)]
struct InMemoryState {
    orders: BTreeMap<OrderId, Order>,
    payments: Vec<Payment>,
    last_id: i64,
    last_payment_id: i64,
    fail_on_save: bool,
    fail_on_commit: bool,
    fail_on_confirm: bool,
    fail_on_rollback: bool,
    transactions_started: usize,
    commits: usize,
    rollbacks: usize,
}

/// In-memory order store implementation for testing.
///
/// Provides the same interface as the PostgreSQL implementation, with
/// auto-increment ids and transactions that only publish rows on commit.
/// Failures can be injected per operation to exercise error paths.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `save_order` fail inside every transaction.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }

    /// Makes `commit` fail, discarding the staged rows.
    pub async fn set_fail_on_commit(&self, fail: bool) {
        self.state.write().await.fail_on_commit = fail;
    }

    /// Makes `confirm_order` fail.
    pub async fn set_fail_on_confirm(&self, fail: bool) {
        self.state.write().await.fail_on_confirm = fail;
    }

    /// Makes `rollback` fail. Staged rows are still discarded.
    pub async fn set_fail_on_rollback(&self, fail: bool) {
        self.state.write().await.fail_on_rollback = fail;
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns how many transactions have been opened.
    pub async fn transactions_started(&self) -> usize {
        self.state.read().await.transactions_started
    }

    /// Returns how many transactions have been committed.
    pub async fn commits(&self) -> usize {
        self.state.read().await.commits
    }

    /// Returns how many rollbacks have been attempted, including failed ones.
    pub async fn rollbacks(&self) -> usize {
        self.state.read().await.rollbacks
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    type Transaction = InMemoryTransaction;

    async fn init_transaction(&self) -> Result<InMemoryTransaction> {
        self.state.write().await.transactions_started += 1;
        Ok(InMemoryTransaction {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        })
    }

    async fn confirm_order(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_confirm {
            return Err(StoreError::Unavailable(format!(
                "confirm rejected for order {order_id}"
            )));
        }

        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;

        let status = order.status();
        order
            .confirm()
            .map_err(|_| StoreError::InvalidTransition { order_id, status })
    }

    async fn find_order_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&order_id).cloned())
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.values().cloned().collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryOrderStore {
    async fn save_payment(
        &self,
        order_id: OrderId,
        instruction: &PaymentInstruction,
        status: PaymentStatus,
    ) -> Result<Payment> {
        let mut state = self.state.write().await;
        state.last_payment_id += 1;

        let payment = Payment {
            id: state.last_payment_id,
            order_id,
            amount: instruction.amount,
            payment_type: instruction.method,
            status,
        };
        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_payments_by_order(&self, order_id: OrderId) -> Result<Vec<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .iter()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }
}

/// Transaction handle for [`InMemoryOrderStore`].
///
/// Saved orders are held here until `commit` moves them into the store.
pub struct InMemoryTransaction {
    state: Arc<RwLock<InMemoryState>>,
    staged: Vec<Order>,
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
    async fn save_order(&mut self, order: &Order) -> Result<OrderId> {
        let mut state = self.state.write().await;

        if state.fail_on_save {
            return Err(StoreError::Unavailable("save rejected".to_string()));
        }

        // Ids are consumed even if the transaction later rolls back.
        state.last_id += 1;
        let order_id = OrderId::new(state.last_id);

        self.staged.push(Order::restore(
            order_id,
            order.customer_id(),
            order.status(),
            order.items().to_vec(),
            Utc::now(),
        ));

        Ok(order_id)
    }

    async fn commit(self) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_commit {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }

        for order in self.staged {
            if let Some(order_id) = order.id() {
                state.orders.insert(order_id, order);
            }
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        let mut state = self.state.write().await;
        state.rollbacks += 1;

        if state.fail_on_rollback {
            return Err(StoreError::Unavailable("rollback rejected".to_string()));
        }
        Ok(())
    }
}
