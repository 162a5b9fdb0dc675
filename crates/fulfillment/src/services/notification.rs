//! Notifier trait and implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{CustomerId, OrderId};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors reported by a notifier.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The message could not be delivered.
    #[error("Failed to deliver e-mail to customer {recipient}: {reason}")]
    DeliveryFailed {
        recipient: CustomerId,
        reason: String,
    },
}

/// An e-mail addressed to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: CustomerId,
    pub subject: String,
    pub body: String,
    pub order_id: Option<OrderId>,
}

impl EmailMessage {
    /// Builds the message sent once an order is confirmed.
    pub fn order_confirmation(order_id: OrderId, recipient: CustomerId) -> Self {
        Self {
            recipient,
            subject: format!("Order #{order_id} confirmed"),
            body: format!("Your order #{order_id} has been paid and confirmed."),
            order_id: Some(order_id),
        }
    }
}

/// Trait for sending e-mails.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a message and waits for the delivery outcome.
    async fn send_email(&self, message: EmailMessage) -> Result<(), NotificationError>;
}

/// Notifier that only logs messages. Used as the simulated e-mail backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(&self, message: EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %message.recipient,
            subject = %message.subject,
            order_id = ?message.order_id,
            "email sent"
        );
        Ok(())
    }
}

/// In-memory notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail_on_send: Arc<AtomicBool>,
}

impl InMemoryNotifier {
    /// Creates a new in-memory notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the notifier to fail on every send.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail_on_send.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of messages delivered.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Returns the messages delivered so far.
    pub async fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send_email(&self, message: EmailMessage) -> Result<(), NotificationError> {
        if self.fail_on_send.load(Ordering::SeqCst) {
            return Err(NotificationError::DeliveryFailed {
                recipient: message.recipient,
                reason: "mailbox unavailable".to_string(),
            });
        }

        self.sent.lock().await.push(message);
        Ok(())
    }
}
