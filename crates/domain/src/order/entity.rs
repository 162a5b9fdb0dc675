//! Order entity.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId};
use serde::Serialize;

use super::{OrderError, OrderItem, OrderStatus, PaymentInstruction};

/// A customer's request to purchase a set of line items.
///
/// An order is built in memory by the caller with no identity, validated,
/// then persisted by the order store which assigns `id` and `created_at`.
/// There is no `Deserialize`: orders enter only through `new` or `restore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Store-assigned identity; `None` until persisted.
    id: Option<OrderId>,

    /// Customer who placed the order.
    customer_id: CustomerId,

    /// Current status of the order.
    status: OrderStatus,

    /// Line items in payload order.
    items: Vec<OrderItem>,

    /// Payment instructions supplied by the caller. Not persisted with the order.
    payments: Vec<PaymentInstruction>,

    /// Insert time, set by the store.
    created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a new, not yet persisted order in `Pending` status.
    pub fn new(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        payments: Vec<PaymentInstruction>,
    ) -> Self {
        Self {
            id: None,
            customer_id,
            status: OrderStatus::Pending,
            items,
            payments,
            created_at: None,
        }
    }

    /// Rebuilds a persisted order from stored rows.
    ///
    /// Payment instructions are not part of the stored order, so the
    /// restored order carries none.
    pub fn restore(
        id: OrderId,
        customer_id: CustomerId,
        status: OrderStatus,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            customer_id,
            status,
            items,
            payments: Vec::new(),
            created_at: Some(created_at),
        }
    }
}

// Query methods
impl Order {
    /// Returns the order ID, if the order has been persisted.
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Returns the customer ID.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the line items.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the payment instructions.
    pub fn payments(&self) -> &[PaymentInstruction] {
        &self.payments
    }

    /// Returns when the store inserted the order.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the sum of `unit_amount * quantity` over all items.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OrderItem::total_amount).sum()
    }

    /// Returns the sum of all payment instruction amounts.
    pub fn payments_total(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

// Mutations
impl Order {
    /// Resets the status to `Pending` ahead of persisting the order.
    pub fn mark_pending(&mut self) {
        self.status = OrderStatus::Pending;
    }

    /// Records the identity assigned by the store.
    pub fn assign_id(&mut self, id: OrderId) {
        self.id = Some(id);
    }

    /// Moves the order from `Pending` to `Confirmed`.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        if !self.status.can_confirm() {
            return Err(OrderError::InvalidStatusTransition {
                current_status: self.status,
                action: "confirm",
            });
        }
        self.status = OrderStatus::Confirmed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;

    fn sample_order() -> Order {
        Order::new(
            CustomerId::new(1),
            vec![
                OrderItem::new(ProductId::new(1), 2, 100.0),
                OrderItem::new(ProductId::new(2), 1, 50.25),
            ],
            vec![PaymentInstruction::credit(250.25)],
        )
    }

    #[test]
    fn test_new_order_is_pending_without_identity() {
        let order = sample_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.id().is_none());
        assert!(order.created_at().is_none());
    }

    #[test]
    fn test_totals() {
        let order = sample_order();
        assert_eq!(order.items_total(), 250.25);
        assert_eq!(order.payments_total(), 250.25);
    }

    #[test]
    fn test_confirm_from_pending() {
        let mut order = sample_order();
        order.confirm().unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
    }

    #[test]
    fn test_confirm_twice_is_invalid() {
        let mut order = sample_order();
        order.confirm().unwrap();

        let result = order.confirm();
        assert!(matches!(
            result,
            Err(OrderError::InvalidStatusTransition {
                current_status: OrderStatus::Confirmed,
                action: "confirm"
            })
        ));
    }

    #[test]
    fn test_mark_pending_resets_status() {
        let mut order = sample_order();
        order.confirm().unwrap();
        order.mark_pending();
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_restore_carries_store_fields() {
        let created_at = Utc::now();
        let order = Order::restore(
            OrderId::new(9),
            CustomerId::new(1),
            OrderStatus::Cancelled,
            vec![OrderItem::new(ProductId::new(1), 1, 10.0)],
            created_at,
        );

        assert_eq!(order.id(), Some(OrderId::new(9)));
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(order.created_at(), Some(created_at));
        assert!(order.payments().is_empty());
        assert!(!order.status().can_confirm());
    }
}
