use chrono::{DateTime, Utc};

use freshcart_core::{DomainError, Entity, Money, ProductId};

/// Catalog input for a new product (catalog management is an external concern;
/// this is what seeding and tests use to populate a ledger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub unit: String,
    pub image: Option<String>,
    pub price: Money,
    pub stock: u32,
    pub featured: bool,
}

/// Current snapshot of a catalog product as held by the inventory ledger.
///
/// Only `stock` (and `updated_at`) change after creation, and only through the
/// ledger's reserve/release operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Free-form label, e.g. "Fruits".
    pub category: String,
    /// Display string, e.g. "per lb".
    pub unit: String,
    pub image: Option<String>,
    pub price: Money,
    pub stock: u32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from catalog input, assigning `id` and timestamps.
    pub fn create(
        id: ProductId,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if input.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }

        Ok(Self {
            id,
            name: input.name,
            description: input.description,
            category: input.category,
            unit: input.unit,
            image: input.image,
            price: input.price,
            stock: input.stock,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Guarded decrement: takes `quantity` units only if that many remain.
    ///
    /// Returns `false` (and leaves the product untouched) when stock is short.
    pub fn take_stock(&mut self, quantity: u32, now: DateTime<Utc>) -> bool {
        if !self.has_stock_for(quantity) {
            return false;
        }
        self.stock -= quantity;
        self.updated_at = now;
        true
    }

    /// Return previously taken units to stock.
    pub fn return_stock(&mut self, quantity: u32, now: DateTime<Utc>) {
        self.stock = self.stock.saturating_add(quantity);
        self.updated_at = now;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
