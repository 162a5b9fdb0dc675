//! Order entity and related types.

mod entity;
mod state;
mod validation;
mod value_objects;

pub use entity::Order;
pub use state::OrderStatus;
pub use validation::{AMOUNT_EPSILON, amounts_match};
pub use value_objects::{OrderItem, PaymentInstruction, PaymentMethod};

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity on a line item.
    #[error("Invalid quantity for product {product_id}: {quantity} (must be greater than 0)")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// Order has no payment instructions.
    #[error("Order has no payments")]
    NoPayments,

    /// Payments do not cover the items exactly.
    #[error("Payments total {payments_total} does not match items total {items_total}")]
    AmountMismatch {
        items_total: f64,
        payments_total: f64,
    },

    /// Order is not in the expected status.
    #[error("Invalid status transition: cannot {action} from {current_status} status")]
    InvalidStatusTransition {
        current_status: OrderStatus,
        action: &'static str,
    },

    /// A status name that does not belong to the state machine.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// A payment method name the payments subsystem does not support.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// A payment status name that does not belong to the payments subsystem.
    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),
}
