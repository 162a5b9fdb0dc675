//! Sell-time validation rules.

use super::{Order, OrderError};

/// Tolerance for comparing floating-point amounts.
pub const AMOUNT_EPSILON: f64 = 1e-6;

/// Returns true if two amounts are equal within [`AMOUNT_EPSILON`].
pub fn amounts_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= AMOUNT_EPSILON
}

impl Order {
    /// Checks that the order can be sold.
    ///
    /// Rules are checked in order and the first failure is returned:
    /// items present, every quantity positive, payments present, and
    /// payments summing to the items total. This is a pure check on the
    /// in-memory order and performs no I/O.
    pub fn validate_to_sell(&self) -> Result<(), OrderError> {
        if self.items().is_empty() {
            return Err(OrderError::NoItems);
        }

        if let Some(item) = self.items().iter().find(|item| item.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        if self.payments().is_empty() {
            return Err(OrderError::NoPayments);
        }

        let items_total = self.items_total();
        let payments_total = self.payments_total();
        if !amounts_match(items_total, payments_total) {
            return Err(OrderError::AmountMismatch {
                items_total,
                payments_total,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrderItem, PaymentInstruction};
    use common::{CustomerId, ProductId};

    fn order(items: Vec<OrderItem>, payments: Vec<PaymentInstruction>) -> Order {
        Order::new(CustomerId::new(1), items, payments)
    }

    #[test]
    fn test_valid_order_passes() {
        let order = order(
            vec![OrderItem::new(ProductId::new(2), 1, 4800.12)],
            vec![PaymentInstruction::credit(4800.12)],
        );
        assert!(order.validate_to_sell().is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let order = order(vec![], vec![PaymentInstruction::credit(10.0)]);
        assert!(matches!(order.validate_to_sell(), Err(OrderError::NoItems)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let order = order(
            vec![
                OrderItem::new(ProductId::new(1), 1, 10.0),
                OrderItem::new(ProductId::new(2), 0, 5.0),
            ],
            vec![PaymentInstruction::credit(10.0)],
        );

        match order.validate_to_sell() {
            Err(OrderError::InvalidQuantity {
                product_id,
                quantity,
            }) => {
                assert_eq!(product_id, ProductId::new(2));
                assert_eq!(quantity, 0);
            }
            other => panic!("expected InvalidQuantity, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_payments_rejected() {
        let order = order(vec![OrderItem::new(ProductId::new(1), 1, 10.0)], vec![]);
        assert!(matches!(
            order.validate_to_sell(),
            Err(OrderError::NoPayments)
        ));
    }

    #[test]
    fn test_amount_mismatch_rejected() {
        let order = order(
            vec![OrderItem::new(ProductId::new(1), 2, 100.0)],
            vec![PaymentInstruction::credit(150.0)],
        );

        match order.validate_to_sell() {
            Err(OrderError::AmountMismatch {
                items_total,
                payments_total,
            }) => {
                assert_eq!(items_total, 200.0);
                assert_eq!(payments_total, 150.0);
            }
            other => panic!("expected AmountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_overpayment_rejected() {
        let order = order(
            vec![OrderItem::new(ProductId::new(1), 1, 100.0)],
            vec![
                PaymentInstruction::credit(60.0),
                PaymentInstruction::credit(60.0),
            ],
        );
        assert!(matches!(
            order.validate_to_sell(),
            Err(OrderError::AmountMismatch { .. })
        ));
    }

    #[test]
    fn test_split_payments_with_float_noise_accepted() {
        // 0.1 + 0.2 != 0.3 in binary floating point
        let order = order(
            vec![OrderItem::new(ProductId::new(1), 1, 0.3)],
            vec![
                PaymentInstruction::credit(0.1),
                PaymentInstruction::credit(0.2),
            ],
        );
        assert!(order.validate_to_sell().is_ok());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        // Zero quantity and missing payments: quantity is checked first.
        let order = order(vec![OrderItem::new(ProductId::new(1), 0, 10.0)], vec![]);
        assert!(matches!(
            order.validate_to_sell(),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_amounts_match_tolerance() {
        assert!(amounts_match(1.0, 1.0 + AMOUNT_EPSILON / 2.0));
        assert!(!amounts_match(1.0, 1.0 + AMOUNT_EPSILON * 10.0));
    }
}
