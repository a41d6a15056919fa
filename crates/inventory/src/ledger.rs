//! The inventory ledger contract.

use std::sync::Arc;

use async_trait::async_trait;

use freshcart_core::ProductId;

use crate::{Product, StoreError};

/// A granted hold on `quantity` units of one product.
///
/// Returned by [`InventoryLedger::reserve`]; handing it back to
/// [`InventoryLedger::release`] returns the units to stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reservation that is neither kept nor released leaks stock"]
pub struct Reservation {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Result of an atomic reserve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented by the requested quantity.
    Reserved(Reservation),
    /// The guarded decrement did not apply; `available` is the stock observed
    /// right after the attempt (another checkout may have consumed it).
    InsufficientStock { available: u32 },
    /// No product with that id exists.
    NotFound,
}

/// Single source of truth for product stock.
///
/// ## Atomicity
///
/// `reserve` must be one atomic check-and-decrement against the backing store
/// (a guarded update, never a read followed by a separate write). Concurrent
/// reservations racing for the last units may not jointly take more than the
/// stock that existed before the race.
///
/// ## Mutation
///
/// `reserve` and `release` are the only operations that change `stock`; no other
/// product field changes except `updated_at`.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Read the current product snapshot (price, stock, metadata).
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Atomically take `quantity` units if at least that many remain.
    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<ReserveOutcome, StoreError>;

    /// Return a reservation's units to stock.
    async fn release(&self, reservation: Reservation) -> Result<(), StoreError>;
}

#[async_trait]
impl<L> InventoryLedger for Arc<L>
where
    L: InventoryLedger + ?Sized,
{
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get_product(id).await
    }

    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<ReserveOutcome, StoreError> {
        (**self).reserve(id, quantity).await
    }

    async fn release(&self, reservation: Reservation) -> Result<(), StoreError> {
        (**self).release(reservation).await
    }
}
