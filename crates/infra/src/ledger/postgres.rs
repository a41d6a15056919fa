//! Postgres-backed inventory ledger.
//!
//! ## Atomicity
//!
//! `reserve` is a single guarded statement:
//!
//! ```sql
//! UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2
//! ```
//!
//! Postgres row locking serializes concurrent updates of the same row, and the
//! `stock >= $2` predicate is re-evaluated against the committed value, so racing
//! checkouts can never drive stock below zero. Only when the update touches no row
//! does a follow-up read distinguish "not found" from "insufficient".

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use freshcart_core::{Money, ProductId};
use freshcart_inventory::{InventoryLedger, Product, Reservation, ReserveOutcome, StoreError};

use super::ProductCatalog;
use crate::db::{from_db_i64, map_sqlx_error, to_db_i64};

#[derive(Debug, Clone)]
pub struct PostgresInventoryLedger {
    pool: Arc<PgPool>,
}

impl PostgresInventoryLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn current_stock(&self, id: ProductId) -> Result<Option<u32>, StoreError> {
        let row = sqlx::query("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("current_stock", e))?;

        row.map(|row| {
            let stock: i64 = row
                .try_get("stock")
                .map_err(|e| map_sqlx_error("current_stock", e))?;
            from_db_i64("stock", stock)
        })
        .transpose()
    }
}

#[async_trait]
impl ProductCatalog for PostgresInventoryLedger {
    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, category, unit, image,
                price_cents, stock, featured, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.image.as_deref())
        .bind(to_db_i64("price", product.price.cents())?)
        .bind(i64::from(product.stock))
        .bind(product.featured)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(())
    }

    async fn product_count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("product_count", e))?;
        from_db_i64("product count", count)
    }
}

#[async_trait]
impl InventoryLedger for PostgresInventoryLedger {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                id, name, description, category, unit, image,
                price_cents, stock, featured, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(|row| {
            ProductRow::from_row(&row)
                .map_err(|e| map_sqlx_error("get_product", e))
                .and_then(Product::try_from)
        })
        .transpose()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<ReserveOutcome, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("reserve", e))?;

        if updated.is_some() {
            return Ok(ReserveOutcome::Reserved(Reservation {
                product_id: id,
                quantity,
            }));
        }

        match self.current_stock(id).await? {
            Some(available) => {
                tracing::warn!(available, "reserve rejected: insufficient stock");
                Ok(ReserveOutcome::InsufficientStock { available })
            }
            None => Ok(ReserveOutcome::NotFound),
        }
    }

    #[instrument(
        skip(self, reservation),
        fields(product_id = %reservation.product_id, quantity = reservation.quantity),
        err
    )]
    async fn release(&self, reservation: Reservation) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(reservation.product_id.as_uuid())
        .bind(i64::from(reservation.quantity))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("release", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::backend(format!(
                "product {} vanished before release",
                reservation.product_id
            )));
        }
        Ok(())
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    category: String,
    unit: String,
    image: Option<String>,
    price_cents: i64,
    stock: i64,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            unit: row.try_get("unit")?,
            image: row.try_get("image")?,
            price_cents: row.try_get("price_cents")?,
            stock: row.try_get("stock")?,
            featured: row.try_get("featured")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            category: row.category,
            unit: row.unit,
            image: row.image,
            price: Money::from_cents(from_db_i64("price_cents", row.price_cents)?),
            stock: from_db_i64("stock", row.stock)?,
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
