//! The search backend seam.
//!
//! The engine never speaks a wire protocol itself; it drives any system
//! offering document upsert, deletion, commit and optimize through this
//! trait. Calls are synchronous from the synchronizer's perspective.

use sync_types::SearchDocument;

use crate::error::BackendError;

/// Query matching every document in an index.
pub const MATCH_ALL: &str = "*:*";

/// A search backend the synchronizer can push documents into.
pub trait SearchBackend: Send + Sync {
    /// Upsert a batch of documents into an index.
    fn add_documents(&self, index: &str, documents: &[SearchDocument])
        -> Result<(), BackendError>;

    /// Delete documents by unique key.
    fn delete_by_key(&self, index: &str, keys: &[String]) -> Result<(), BackendError>;

    /// Delete every document matching a query.
    fn delete_by_query(&self, index: &str, query: &str) -> Result<(), BackendError>;

    /// Make pending changes visible.
    fn commit(&self, index: &str) -> Result<(), BackendError>;

    /// Merge index segments to bound fragmentation. Issued periodically
    /// after commits; failures are logged but never fail a run.
    fn optimize(&self, index: &str) -> Result<(), BackendError>;
}
