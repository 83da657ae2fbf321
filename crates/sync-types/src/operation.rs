//! The manipulation types a synchronizer can apply to an index.

use serde::{Deserialize, Serialize};

/// What a sync run should do for a (record type, index) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    /// First-time indexing of records.
    Create,
    /// Re-index records that may already exist in the backend.
    Update,
    /// Remove the given records by key.
    Delete,
    /// Remove every document in the index with a single match-all query.
    DeleteAll,
}

impl SyncOperation {
    /// Whether this operation needs documents built.
    pub fn builds_documents(&self) -> bool {
        matches!(self, SyncOperation::Create | SyncOperation::Update)
    }

    /// Whether this operation removes data from the index.
    pub fn is_destructive(&self) -> bool {
        matches!(self, SyncOperation::Delete | SyncOperation::DeleteAll)
    }
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOperation::Create => write!(f, "create"),
            SyncOperation::Update => write!(f, "update"),
            SyncOperation::Delete => write!(f, "delete"),
            SyncOperation::DeleteAll => write!(f, "deleteall"),
        }
    }
}
