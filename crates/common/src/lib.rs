//! Shared types for the order fulfillment service.

mod types;

pub use types::{CustomerId, OrderId, ProductId};
