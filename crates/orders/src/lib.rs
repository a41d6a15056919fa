//! Orders domain module.
//!
//! This crate contains the order model (immutable, snapshotted line items), the
//! pricing rules, the persistence contract, and the [`OrderAssembler`] that turns
//! a submitted cart into a priced, stock-reserved, persisted order.

pub mod assembler;
pub mod error;
pub mod order;
pub mod pricing;
pub mod repository;
pub mod request;

pub use assembler::OrderAssembler;
pub use error::PlaceOrderError;
pub use order::{CustomerInfo, Order, OrderLineItem, OrderParts, OrderStatus};
pub use pricing::{DELIVERY_FEE, OrderTotals};
pub use repository::OrderRepository;
pub use request::{CartItem, CartLine, PlaceOrder, ValidatedCart};
