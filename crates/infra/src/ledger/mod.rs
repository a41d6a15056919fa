//! Inventory ledger backends.

use async_trait::async_trait;

use freshcart_inventory::{Product, StoreError};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInventoryLedger;
pub use postgres::PostgresInventoryLedger;

/// Catalog writes used to stock a ledger (seeding, fixtures).
///
/// Kept apart from [`freshcart_inventory::InventoryLedger`] so the checkout path
/// can only reserve and release.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Insert a new product. A duplicate id is a [`StoreError::Conflict`].
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    async fn product_count(&self) -> Result<u64, StoreError>;
}
