//! Collaborator traits and simulated implementations for sell steps.

pub mod notification;
pub mod payment;

pub use notification::{EmailMessage, InMemoryNotifier, LogNotifier, NotificationError, Notifier};
pub use payment::{PaymentError, PaymentGateway, SimulatedPaymentGateway};
