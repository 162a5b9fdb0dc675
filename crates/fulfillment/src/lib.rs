//! Order fulfillment workflow.
//!
//! This crate provides the `Sell` operation, which takes a proposed order
//! through these steps:
//! 1. Validate the order
//! 2. Save it as pending inside a store transaction and commit
//! 3. Process its payments
//! 4. Confirm the order
//! 5. Send a confirmation e-mail
//!
//! Only step 2 is transactional. A failure after the commit leaves the
//! effects of earlier steps in place and is returned to the caller.

pub mod error;
pub mod services;
pub mod steps;
pub mod workflow;

pub use error::FulfillmentError;
pub use services::{
    EmailMessage, InMemoryNotifier, LogNotifier, NotificationError, Notifier, PaymentError,
    PaymentGateway, SimulatedPaymentGateway,
};
pub use workflow::OrderWorkflow;
