use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use freshcart_core::ProductId;
use freshcart_inventory::{InventoryLedger, Product, Reservation, ReserveOutcome, StoreError};

use super::ProductCatalog;

/// In-memory inventory ledger.
///
/// Intended for tests/dev. Each reserve runs its check and decrement under one
/// write lock, which is what makes it atomic.
#[derive(Debug, Default)]
pub struct InMemoryInventoryLedger {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryInventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryInventoryLedger {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        if products.contains_key(&product.id) {
            return Err(StoreError::conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn product_count(&self) -> Result<u64, StoreError> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(products.len() as u64)
    }
}

#[async_trait]
impl InventoryLedger for InMemoryInventoryLedger {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(products.get(&id).cloned())
    }

    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<ReserveOutcome, StoreError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let Some(product) = products.get_mut(&id) else {
            return Ok(ReserveOutcome::NotFound);
        };

        if product.take_stock(quantity, Utc::now()) {
            Ok(ReserveOutcome::Reserved(Reservation {
                product_id: id,
                quantity,
            }))
        } else {
            Ok(ReserveOutcome::InsufficientStock {
                available: product.stock,
            })
        }
    }

    async fn release(&self, reservation: Reservation) -> Result<(), StoreError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let product = products.get_mut(&reservation.product_id).ok_or_else(|| {
            StoreError::backend(format!(
                "product {} vanished before release",
                reservation.product_id
            ))
        })?;
        product.return_stock(reservation.quantity, Utc::now());
        Ok(())
    }
}
