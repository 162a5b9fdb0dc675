//! Domain layer for the order fulfillment service.
//!
//! This crate provides:
//! - The `Order` entity with its line items and payment instructions
//! - Sell-time validation rules (`Order::validate_to_sell`)
//! - The order status state machine
//! - Payment records produced by the payments subsystem

pub mod order;
pub mod payment;

pub use common::{CustomerId, OrderId, ProductId};
pub use order::{
    AMOUNT_EPSILON, Order, OrderError, OrderItem, OrderStatus, PaymentInstruction, PaymentMethod,
    amounts_match,
};
pub use payment::{Payment, PaymentStatus};
