use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    CustomerId, Order, OrderItem, OrderStatus, Payment, PaymentInstruction, PaymentMethod,
    PaymentStatus, ProductId,
};
use sqlx::{PgPool, Postgres, Row, postgres::PgRow};

use crate::{
    OrderId, Result, StoreError,
    payment::PaymentRepository,
    store::{OrderStore, OrderTransaction},
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_item(row: &PgRow) -> Result<(OrderId, OrderItem)> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::CorruptRow(format!("item quantity {quantity} out of range")))?;

        Ok((
            OrderId::new(row.try_get("order_id")?),
            OrderItem::new(
                ProductId::new(row.try_get("product_id")?),
                quantity,
                row.try_get("amount")?,
            ),
        ))
    }

    fn row_to_order(row: &PgRow, items: Vec<OrderItem>) -> Result<Order> {
        let status: String = row.try_get("status")?;

        Ok(Order::restore(
            OrderId::new(row.try_get("id")?),
            CustomerId::new(row.try_get("customer_id")?),
            status.parse::<OrderStatus>()?,
            items,
            row.try_get::<DateTime<Utc>, _>("created_at")?,
        ))
    }

    fn row_to_payment(row: &PgRow) -> Result<Payment> {
        let payment_type: String = row.try_get("type")?;
        let status: String = row.try_get("status")?;

        Ok(Payment {
            id: row.try_get("id")?,
            order_id: OrderId::new(row.try_get("order_id")?),
            amount: row.try_get("amount")?,
            payment_type: payment_type.parse::<PaymentMethod>()?,
            status: status.parse::<PaymentStatus>()?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    type Transaction = PostgresTransaction;

    async fn init_transaction(&self) -> Result<PostgresTransaction> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTransaction { tx })
    }

    async fn confirm_order(&self, order_id: OrderId) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2 AND status = $3")
            .bind(OrderStatus::Confirmed.as_str())
            .bind(order_id.as_i64())
            .bind(OrderStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Nothing updated: either the order is missing or it is not pending.
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
            .bind(order_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match status {
            None => Err(StoreError::OrderNotFound(order_id)),
            Some(status) => Err(StoreError::InvalidTransition {
                order_id,
                status: status.parse()?,
            }),
        }
    }

    async fn find_order_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, status, customer_id, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = sqlx::query(
            r#"
            SELECT order_id, product_id, quantity, amount
            FROM items
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(|row| Self::row_to_item(row).map(|(_, item)| item))
            .collect::<Result<Vec<_>>>()?;

        Self::row_to_order(&row, items).map(Some)
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let order_rows = sqlx::query(
            r#"
            SELECT id, status, customer_id, created_at
            FROM orders
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query(
            r#"
            SELECT order_id, product_id, quantity, amount
            FROM items
            ORDER BY order_id ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let (order_id, item) = Self::row_to_item(row)?;
            items_by_order.entry(order_id).or_default().push(item);
        }

        order_rows
            .iter()
            .map(|row| {
                let order_id = OrderId::new(row.try_get("id")?);
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }
}

#[async_trait]
impl PaymentRepository for PostgresOrderStore {
    async fn save_payment(
        &self,
        order_id: OrderId,
        instruction: &PaymentInstruction,
        status: PaymentStatus,
    ) -> Result<Payment> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO payments (amount, type, status, order_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(instruction.amount)
        .bind(instruction.method.as_str())
        .bind(status.as_str())
        .bind(order_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(Payment {
            id,
            order_id,
            amount: instruction.amount,
            payment_type: instruction.method,
            status,
        })
    }

    async fn find_payments_by_order(&self, order_id: OrderId) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, amount, type, status, order_id
            FROM payments
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_payment).collect()
    }
}

/// Transaction handle for [`PostgresOrderStore`].
///
/// Wraps a sqlx transaction, which rolls back if dropped unresolved.
pub struct PostgresTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PostgresTransaction {
    async fn save_order(&mut self, order: &Order) -> Result<OrderId> {
        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (status, customer_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(order.status().as_str())
        .bind(order.customer_id().as_i64())
        .fetch_one(&mut *self.tx)
        .await?;

        for item in order.items() {
            sqlx::query(
                r#"
                INSERT INTO items (product_id, quantity, order_id, amount)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.product_id.as_i64())
            .bind(i64::from(item.quantity))
            .bind(order_id)
            .bind(item.unit_amount)
            .execute(&mut *self.tx)
            .await?;
        }

        tracing::debug!(order_id, items = order.items().len(), "order staged");
        Ok(OrderId::new(order_id))
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
