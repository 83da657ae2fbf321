//! The store seam: paginated enumeration and relation traversal.

use sync_types::{RecordId, ViewerId};

use crate::error::StoreError;
use crate::record::Record;

/// A system offering paginated, identity-ordered enumeration of typed
/// records, plus relation traversal.
///
/// `fetch` must return records sorted by id ascending; that ordering is
/// what makes batch partitioning deterministic, gap-free and overlap-free
/// even when page sizes change between runs.
pub trait RecordStore: Send + Sync {
    /// Total records of a type.
    fn count(&self, type_name: &str) -> Result<usize, StoreError>;

    /// Fetch up to `limit` records of a type starting at `offset`,
    /// ordered by id ascending.
    fn fetch(
        &self,
        type_name: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Box<dyn Record>>, StoreError>;

    /// Fetch specific records of a type by identity. Missing identities
    /// are skipped, not errors; a dirty-record retry pass must tolerate
    /// records deleted since they were marked.
    fn fetch_by_ids(
        &self,
        type_name: &str,
        ids: &[RecordId],
    ) -> Result<Vec<Box<dyn Record>>, StoreError>;

    /// Records related to `record` through the named relation, in id
    /// order. An unknown relation name yields an empty set.
    fn related(&self, record: &dyn Record, relation: &str)
        -> Result<Vec<Box<dyn Record>>, StoreError>;

    /// Every viewer known to the store, for visibility markers.
    fn viewers(&self) -> Vec<ViewerId>;
}
