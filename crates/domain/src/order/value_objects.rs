//! Value objects for the order domain.

use std::str::FromStr;

use common::ProductId;
use serde::{Deserialize, Serialize};

use super::OrderError;

/// A line item in an order.
///
/// Prices are denormalized onto the item from the order payload, so no
/// catalog lookup is needed to total an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product being bought.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit.
    pub unit_amount: f64,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_id: ProductId, quantity: u32, unit_amount: f64) -> Self {
        Self {
            product_id,
            quantity,
            unit_amount,
        }
    }

    /// Returns the total amount for this item (unit_amount * quantity).
    pub fn total_amount(&self) -> f64 {
        self.unit_amount * f64::from(self.quantity)
    }
}

/// How a payment instruction is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Credit,
}

impl PaymentMethod {
    /// Returns the persisted method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Credit => "CREDIT",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" => Ok(PaymentMethod::Credit),
            other => Err(OrderError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// A caller-supplied instruction to charge part of an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    /// Amount to charge.
    pub amount: f64,

    /// How to charge it.
    #[serde(default)]
    pub method: PaymentMethod,
}

impl PaymentInstruction {
    /// Creates a new payment instruction.
    pub fn new(amount: f64, method: PaymentMethod) -> Self {
        Self { amount, method }
    }

    /// Creates a credit payment instruction.
    pub fn credit(amount: f64) -> Self {
        Self::new(amount, PaymentMethod::Credit)
    }
}
