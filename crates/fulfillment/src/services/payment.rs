//! Payment gateway trait and simulated implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::OrderId;
use domain::{PaymentInstruction, PaymentStatus};
use order_store::PaymentRepository;
use thiserror::Error;

/// Errors reported by a payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// A payment instruction was refused.
    #[error("Payment declined for order {order_id}: {reason}")]
    Declined { order_id: OrderId, reason: String },

    /// The gateway could not process the request.
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// Trait for charging an order's payment instructions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges every instruction against a placed order.
    ///
    /// Any one failure fails the whole call. Instructions charged before the
    /// failure are the gateway's concern, not the caller's.
    async fn process_payments(
        &self,
        payments: &[PaymentInstruction],
        order_id: OrderId,
    ) -> Result<(), PaymentError>;
}

/// Simulated payment gateway that records each charge in a payment repository.
///
/// Accepts every positive amount unless configured to decline. Declined and
/// invalid instructions are recorded as `REJECTED` before the call fails.
#[derive(Clone)]
pub struct SimulatedPaymentGateway<R: PaymentRepository> {
    ledger: R,
    decline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl<R: PaymentRepository> SimulatedPaymentGateway<R> {
    /// Creates a gateway recording payments in `ledger`.
    pub fn new(ledger: R) -> Self {
        Self {
            ledger,
            decline: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configures the gateway to decline every charge.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.decline.store(fail, Ordering::SeqCst);
    }

    /// Returns how many times `process_payments` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn record(
        &self,
        order_id: OrderId,
        instruction: &PaymentInstruction,
        status: PaymentStatus,
    ) -> Result<(), PaymentError> {
        self.ledger
            .save_payment(order_id, instruction, status)
            .await
            .map(|_| ())
            .map_err(|e| PaymentError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl<R: PaymentRepository> PaymentGateway for SimulatedPaymentGateway<R> {
    #[tracing::instrument(skip(self, payments), fields(payment_count = payments.len()))]
    async fn process_payments(
        &self,
        payments: &[PaymentInstruction],
        order_id: OrderId,
    ) -> Result<(), PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for instruction in payments {
            let reason = if self.decline.load(Ordering::SeqCst) {
                Some("card declined".to_string())
            } else if instruction.amount <= 0.0 {
                Some(format!("invalid amount {}", instruction.amount))
            } else {
                None
            };

            if let Some(reason) = reason {
                self.record(order_id, instruction, PaymentStatus::Rejected)
                    .await?;
                tracing::warn!(%order_id, amount = instruction.amount, %reason, "payment rejected");
                return Err(PaymentError::Declined { order_id, reason });
            }

            self.record(order_id, instruction, PaymentStatus::Accepted)
                .await?;
            tracing::info!(%order_id, amount = instruction.amount, method = %instruction.method, "payment accepted");
        }

        Ok(())
    }
}
