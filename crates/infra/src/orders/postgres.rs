//! Postgres-backed order repository.
//!
//! Line items are stored as a JSONB array on the order row. They are snapshots,
//! so there is deliberately no foreign key to `products`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use freshcart_core::{Money, OrderId, UserId};
use freshcart_inventory::StoreError;
use freshcart_orders::{
    CustomerInfo, Order, OrderLineItem, OrderParts, OrderRepository, OrderStatus, OrderTotals,
};

use crate::db::{from_db_i64, map_sqlx_error, to_db_i64};

const SELECT_ORDER: &str = r#"
    SELECT
        id, user_id, customer_name, customer_email, customer_phone,
        delivery_address, items, subtotal_cents, delivery_fee_cents,
        total_cents, order_notes, status, created_at, updated_at
    FROM orders
"#;

#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: Arc<PgPool>,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn decode_all(
        operation: &str,
        rows: Vec<sqlx::postgres::PgRow>,
    ) -> Result<Vec<Order>, StoreError> {
        rows.iter()
            .map(|row| {
                OrderRow::from_row(row)
                    .map_err(|e| map_sqlx_error(operation, e))
                    .and_then(Order::try_from)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id_typed()), err)]
    async fn create(&self, order: &Order) -> Result<(), StoreError> {
        let items = serde_json::to_value(order.items())
            .map_err(|e| StoreError::serialization(format!("failed to encode line items: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, customer_name, customer_email, customer_phone,
                delivery_address, items, subtotal_cents, delivery_fee_cents,
                total_cents, order_notes, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id_typed().as_uuid())
        .bind(order.user_id().map(uuid::Uuid::from))
        .bind(&order.customer().name)
        .bind(&order.customer().email)
        .bind(&order.customer().phone)
        .bind(order.delivery_address())
        .bind(items)
        .bind(to_db_i64("subtotal", order.subtotal().cents())?)
        .bind(to_db_i64("delivery_fee", order.delivery_fee().cents())?)
        .bind(to_db_i64("total", order.total().cents())?)
        .bind(order.order_notes())
        .bind(order.status().as_str())
        .bind(order.created_at())
        .bind(order.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_order", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_order_by_id", e))?;

        row.map(|row| {
            OrderRow::from_row(&row)
                .map_err(|e| map_sqlx_error("find_order_by_id", e))
                .and_then(Order::try_from)
        })
        .transpose()
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_orders_by_user", e))?;

        Self::decode_all("find_orders_by_user", rows)
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE customer_email = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(email)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_orders_by_email", e))?;

        Self::decode_all("find_orders_by_email", rows)
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status), err)]
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .bind(now)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_order_status", e))?;

        Ok(result.rows_affected() > 0)
    }
}

// SQLx row types

#[derive(Debug)]
struct OrderRow {
    id: uuid::Uuid,
    user_id: Option<uuid::Uuid>,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    delivery_address: String,
    items: serde_json::Value,
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
    order_notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            customer_phone: row.try_get("customer_phone")?,
            delivery_address: row.try_get("delivery_address")?,
            items: row.try_get("items")?,
            subtotal_cents: row.try_get("subtotal_cents")?,
            delivery_fee_cents: row.try_get("delivery_fee_cents")?,
            total_cents: row.try_get("total_cents")?,
            order_notes: row.try_get("order_notes")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderLineItem> = serde_json::from_value(row.items).map_err(|e| {
            StoreError::serialization(format!("order {} has malformed items: {e}", row.id))
        })?;
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| StoreError::serialization(format!("order {}: {e}", row.id)))?;

        Order::from_parts(OrderParts {
            id: OrderId::from_uuid(row.id),
            user_id: row.user_id.map(UserId::from_uuid),
            customer: CustomerInfo {
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
            delivery_address: row.delivery_address,
            items,
            totals: OrderTotals {
                subtotal: Money::from_cents(from_db_i64("subtotal_cents", row.subtotal_cents)?),
                delivery_fee: Money::from_cents(from_db_i64(
                    "delivery_fee_cents",
                    row.delivery_fee_cents,
                )?),
                total: Money::from_cents(from_db_i64("total_cents", row.total_cents)?),
            },
            order_notes: row.order_notes,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .map_err(|e| StoreError::serialization(format!("order {}: {e}", row.id)))
    }
}
