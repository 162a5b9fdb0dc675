//! Sell error types.

use domain::OrderError;
use order_store::StoreError;
use thiserror::Error;

use crate::services::{NotificationError, PaymentError};

/// Errors returned by the sell workflow.
///
/// The variant tells the caller how far the sale got: a validation error
/// has no side effects, while a notification error means the order is
/// already confirmed.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The order is malformed or inconsistent. Nothing was persisted.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderError),

    /// The store failed to begin, save, commit, confirm, or read.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The payment gateway rejected or could not process the payments.
    /// The order remains stored as pending.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// The order is confirmed but the confirmation could not be sent.
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl FulfillmentError {
    /// Returns the error category name.
    pub fn kind(&self) -> &'static str {
        match self {
            FulfillmentError::Validation(_) => "validation",
            FulfillmentError::Persistence(_) => "persistence",
            FulfillmentError::Payment(_) => "payment",
            FulfillmentError::Notification(_) => "notification",
        }
    }
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
