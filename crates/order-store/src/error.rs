use domain::{OrderError, OrderStatus};
use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The stored order is not in a status that allows the requested change.
    #[error("Order {order_id} cannot be confirmed from {status} status")]
    InvalidTransition {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// A stored row could not be mapped back onto the domain model.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// The store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<OrderError> for StoreError {
    fn from(e: OrderError) -> Self {
        StoreError::CorruptRow(e.to_string())
    }
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
