use async_trait::async_trait;
use domain::{Payment, PaymentInstruction, PaymentStatus};

use crate::{OrderId, Result};

/// Persistence for payment records written by a payment gateway.
///
/// Payments reference their order by id only; recording a payment never
/// touches the order row.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Records the outcome of charging one instruction and returns the stored payment.
    async fn save_payment(
        &self,
        order_id: OrderId,
        instruction: &PaymentInstruction,
        status: PaymentStatus,
    ) -> Result<Payment>;

    /// Retrieves all payments recorded for an order, oldest first.
    async fn find_payments_by_order(&self, order_id: OrderId) -> Result<Vec<Payment>>;
}
