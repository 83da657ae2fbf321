//! Error types for document building.

use sync_store::StoreError;
use thiserror::Error;

/// Errors raised while building documents.
///
/// Field and value problems yield absent fields, not errors; only record
/// store access surfaces here.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The record store failed during extraction.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
