use thiserror::Error;

/// Backing store failure (connectivity, serialization, corrupt rows).
///
/// These are infrastructure errors as opposed to domain outcomes: a missing
/// product or exhausted stock is reported through [`crate::ReserveOutcome`],
/// never through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A persisted record could not be decoded (or a value could not be encoded).
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A write collided with existing state (e.g. duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
