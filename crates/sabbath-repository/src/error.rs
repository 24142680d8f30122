//! Error types for the store layer

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Backing store unreachable, or the call timed out
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Insert would violate a uniqueness constraint
    #[error("Duplicate key in {collection}: {field} = {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// Document cannot be represented by the backend
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Any other backend failure
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }
}
