//! Payment records kept by the payments subsystem.

use std::str::FromStr;

use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::order::{OrderError, PaymentMethod};

/// Outcome of charging a single payment instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Canceled,
    Failed,
}

impl PaymentStatus {
    /// Returns true if money has moved for this payment.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Accepted)
    }

    /// Returns the persisted status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Accepted => "ACCEPTED",
            PaymentStatus::Rejected => "REJECTED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "ACCEPTED" => Ok(PaymentStatus::Accepted),
            "REJECTED" => Ok(PaymentStatus::Rejected),
            "CANCELED" => Ok(PaymentStatus::Canceled),
            "FAILED" => Ok(PaymentStatus::Failed),
            other => Err(OrderError::UnknownPaymentStatus(other.to_string())),
        }
    }
}

/// A payment recorded against a placed order.
///
/// `order_id` is a back-reference; the order does not own its payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: OrderId,
    pub amount: f64,
    pub payment_type: PaymentMethod,
    pub status: PaymentStatus,
}
