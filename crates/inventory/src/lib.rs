//! Inventory ledger domain module.
//!
//! The ledger is the single source of truth for available product stock and the
//! only component allowed to decrement it. This crate holds the product model and
//! the storage-agnostic ledger contract; concrete stores live in `freshcart-infra`.

pub mod error;
pub mod ledger;
pub mod product;

pub use error::StoreError;
pub use ledger::{InventoryLedger, ReserveOutcome, Reservation};
pub use product::{NewProduct, Product};
