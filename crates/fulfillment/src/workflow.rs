//! Sell workflow orchestrating the order store, payment gateway, and notifier.

use std::time::Instant;

use common::OrderId;
use domain::Order;
use order_store::{OrderStore, OrderTransaction};

use crate::error::{FulfillmentError, Result};
use crate::services::notification::{EmailMessage, Notifier};
use crate::services::payment::PaymentGateway;
use crate::steps;

/// Orchestrates the sale of an order.
///
/// The workflow drives a fixed sequence: validate, save as pending in a
/// transaction, charge, confirm, notify. Only the save is transactional.
/// Later steps are not undone when a following step fails; their effects
/// stay in place and the error is returned to the caller.
pub struct OrderWorkflow<S, P, N>
where
    S: OrderStore,
    P: PaymentGateway,
    N: Notifier,
{
    store: S,
    payments: P,
    notifier: N,
}

impl<S, P, N> OrderWorkflow<S, P, N>
where
    S: OrderStore,
    P: PaymentGateway,
    N: Notifier,
{
    /// Creates a new workflow over its three collaborators.
    pub fn new(store: S, payments: P, notifier: N) -> Self {
        Self {
            store,
            payments,
            notifier,
        }
    }

    /// Validates, persists, charges, confirms, and notifies for one order.
    ///
    /// On success the order carries its store-assigned id and is confirmed.
    /// On failure every step before the failing one keeps its effect:
    /// - a payment failure leaves the order stored as pending;
    /// - a confirm failure leaves the order pending with its payments taken;
    /// - a notification failure leaves the order confirmed.
    #[tracing::instrument(skip(self, order), fields(customer_id = %order.customer_id()))]
    pub async fn sell(&self, order: &mut Order) -> Result<()> {
        metrics::counter!("sell_attempts_total").increment(1);
        let started = Instant::now();

        let result = self.run_sell(order).await;

        metrics::histogram!("sell_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(()) => {
                metrics::counter!("orders_sold_total").increment(1);
                tracing::info!(order_id = ?order.id(), "order sold");
            }
            Err(e) => {
                metrics::counter!("sell_failures_total", "kind" => e.kind()).increment(1);
                tracing::warn!(order_id = ?order.id(), kind = e.kind(), error = %e, "sell failed");
            }
        }

        result
    }

    async fn run_sell(&self, order: &mut Order) -> Result<()> {
        // 1. Validate before any I/O
        tracing::debug!(step = steps::STEP_VALIDATE, "sell step started");
        order.validate_to_sell()?;

        // 2-4. Persist as pending inside a transaction
        let order_id = self.persist_pending(order).await?;

        // 5. Adopt the committed identity
        order.assign_id(order_id);

        // 6. Charge. A failure leaves the committed order pending.
        tracing::info!(step = steps::STEP_PROCESS_PAYMENTS, %order_id, "sell step started");
        self.payments
            .process_payments(order.payments(), order_id)
            .await?;

        // 7. Confirm, separately from the insert transaction
        tracing::info!(step = steps::STEP_CONFIRM_ORDER, %order_id, "sell step started");
        self.store.confirm_order(order_id).await?;
        order.confirm()?;

        // 8. Notify. A failure does not unwind the confirmation.
        tracing::info!(step = steps::STEP_SEND_CONFIRMATION, %order_id, "sell step started");
        self.notifier
            .send_email(EmailMessage::order_confirmation(
                order_id,
                order.customer_id(),
            ))
            .await?;

        Ok(())
    }

    /// Saves the order as pending and commits, returning the assigned id.
    ///
    /// The transaction is resolved on every path: committed, rolled back
    /// after a failed save, or consumed by a failed commit.
    async fn persist_pending(&self, order: &mut Order) -> Result<OrderId> {
        let mut tx = self.store.init_transaction().await?;

        order.mark_pending();
        tracing::debug!(step = steps::STEP_SAVE_ORDER, "sell step started");
        let order_id = match tx.save_order(order).await {
            Ok(order_id) => order_id,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback after failed save also failed");
                }
                return Err(FulfillmentError::Persistence(e));
            }
        };

        tracing::debug!(step = steps::STEP_COMMIT, %order_id, "sell step started");
        tx.commit().await?;

        Ok(order_id)
    }

    /// Loads an order by id.
    ///
    /// Returns None if the order does not exist.
    pub async fn get_order_details(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.find_order_by_id(order_id).await?)
    }

    /// Loads every order.
    pub async fn get_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.get_all_orders().await?)
    }
}
