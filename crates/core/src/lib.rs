//! `freshcart-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, money, and the domain error model shared by the storefront crates.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{OrderId, ProductId, UserId};
pub use money::Money;
pub use value_object::ValueObject;
