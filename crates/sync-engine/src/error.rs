//! Error types for the synchronization engine.

use sync_docs::DocumentError;
use sync_store::StoreError;
use thiserror::Error;

/// A failed request to the search backend.
///
/// Carries the status and diagnostic payload the backend returned, when
/// there was one; a transport-level failure has neither.
#[derive(Debug, Clone, Error)]
#[error("Backend request failed{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
pub struct BackendError {
    /// Protocol status code, if the backend answered at all.
    pub status: Option<u16>,
    /// Diagnostic message or response body.
    pub message: String,
}

impl BackendError {
    /// A transport-level failure without a status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// A failure the backend answered with a status code.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the synchronization engine.
///
/// Batch-level backend failures never surface here: they are logged,
/// recorded in the dirty tracker and the run continues. What does
/// surface is fatal for the call: configuration mistakes, store access
/// failures, and backend failures on targeted (non-batch) operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Record store access failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Document building failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A targeted backend request failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The named index is not configured.
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    /// A destructive operation was handed an empty record set.
    #[error("Cannot manipulate an empty record set")]
    EmptyRecordSet,

    /// The call was misconfigured.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::new("connection refused");
        assert_eq!(err.to_string(), "Backend request failed: connection refused");

        let err = BackendError::with_status(503, "service unavailable");
        assert_eq!(
            err.to_string(),
            "Backend request failed (503): service unavailable"
        );
    }

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::UnknownIndex("ghost".to_string());
        assert_eq!(err.to_string(), "Unknown index: ghost");

        let err = SyncError::EmptyRecordSet;
        assert_eq!(err.to_string(), "Cannot manipulate an empty record set");
    }
}
