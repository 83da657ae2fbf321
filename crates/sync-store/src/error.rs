//! Error types for record store access.

use thiserror::Error;

/// Errors raised by a record store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record type is not known to the store.
    #[error("Unknown record type: {0}")]
    UnknownType(String),

    /// A specific record could not be found.
    #[error("Record not found: {type_name}-{id}")]
    NotFound { type_name: String, id: u64 },

    /// The backing store failed.
    #[error("Store error: {0}")]
    Backend(String),
}
