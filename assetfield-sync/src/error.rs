//! Error types for the sync core.

use thiserror::Error;

/// Result type for field sync operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors surfaced while mediating between the store, the picker and local
/// state.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Remote field store failure, on read or write.
    #[error("remote store error: {0}")]
    Store(String),

    /// Picker flow failed before resolving.
    #[error("picker error: {0}")]
    Picker(String),

    /// Value could not be serialized for the remote store.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
