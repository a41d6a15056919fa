use thiserror::Error;

use freshcart_core::{DomainError, ProductId};
use freshcart_inventory::StoreError;

/// Why an order could not be placed.
///
/// Every variant except `Store` is a client-correctable outcome. When any of
/// them is returned no order exists and all stock taken for the attempt has
/// been handed back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaceOrderError {
    /// Missing customer fields, an empty cart, or a non-positive quantity.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A cart item names a product that does not exist (or an unparseable id).
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: String },

    /// A cart item asks for more units than remain in stock.
    #[error("Insufficient stock for {product_name}")]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// The ledger or order store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlaceOrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn product_not_found(product_id: impl Into<String>) -> Self {
        Self::ProductNotFound {
            product_id: product_id.into(),
        }
    }

    /// Whether the failure was caused by the request rather than the stores.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<DomainError> for PlaceOrderError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Store(StoreError::backend(other.to_string())),
        }
    }
}
