//! Batch planning: fixed-size, identity-ordered slices of a record set.
//!
//! Because enumeration is always id ascending, the batches of one plan
//! partition the record set exactly: no identity twice, none skipped,
//! `ceil(count / page_size)` batches with only the tail batch short.
//! Enumeration can start at any batch index, which is what lets an
//! interrupted run resume and a harness reindex a single batch.

use tracing::debug;

use sync_store::{Record, RecordStore};

use crate::error::SyncError;

/// A batch layout for one record type at a fixed point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    /// The record type being partitioned.
    pub type_name: String,
    /// Records per batch.
    pub page_size: usize,
    /// Total records at planning time.
    pub total_records: usize,
    /// `ceil(total_records / page_size)`.
    pub total_batches: usize,
}

impl BatchPlan {
    /// Plan batches for a type's full record set.
    pub fn compute(
        store: &dyn RecordStore,
        type_name: &str,
        page_size: usize,
    ) -> Result<Self, SyncError> {
        if page_size == 0 {
            return Err(SyncError::Config("page size must be > 0".to_string()));
        }
        let total_records = store.count(type_name)?;
        let total_batches = total_records.div_ceil(page_size);
        debug!(
            type_name = type_name,
            total_records = total_records,
            page_size = page_size,
            total_batches = total_batches,
            "Planned batches"
        );
        Ok(Self {
            type_name: type_name.to_string(),
            page_size,
            total_records,
            total_batches,
        })
    }

    /// Fetch the records of one batch, ordered by id ascending.
    ///
    /// A batch index at or past the end yields an empty set.
    pub fn fetch(
        &self,
        store: &dyn RecordStore,
        batch_index: usize,
    ) -> Result<Vec<Box<dyn Record>>, SyncError> {
        let offset = batch_index.saturating_mul(self.page_size);
        Ok(store.fetch(&self.type_name, offset, self.page_size)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use sync_store::{MemoryRecord, MemoryStore};

    fn store_with(n: u64) -> MemoryStore {
        let mut store = MemoryStore::new();
        for id in 1..=n {
            store.insert(MemoryRecord::new("Article", id));
        }
        store
    }

    #[test]
    fn test_25_records_page_10_is_3_batches() {
        let store = store_with(25);
        let plan = BatchPlan::compute(&store, "Article", 10).unwrap();
        assert_eq!(plan.total_batches, 3);

        let sizes: Vec<usize> = (0..3)
            .map(|i| plan.fetch(&store, i).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_batches_partition_exactly() {
        // For a spread of page sizes, batches cover every identity
        // exactly once.
        let store = store_with(23);
        for page_size in 1..=25 {
            let plan = BatchPlan::compute(&store, "Article", page_size).unwrap();
            assert_eq!(plan.total_batches, 23usize.div_ceil(page_size));

            let mut seen = BTreeSet::new();
            let mut total = 0;
            for batch in 0..plan.total_batches {
                for record in plan.fetch(&store, batch).unwrap() {
                    assert!(seen.insert(record.id()), "duplicate id at page {page_size}");
                    total += 1;
                }
            }
            assert_eq!(total, 23, "missing ids at page {page_size}");
        }
    }

    #[test]
    fn test_batches_are_id_ordered() {
        let store = store_with(10);
        let plan = BatchPlan::compute(&store, "Article", 4).unwrap();
        let mut previous = 0;
        for batch in 0..plan.total_batches {
            for record in plan.fetch(&store, batch).unwrap() {
                assert!(record.id() > previous);
                previous = record.id();
            }
        }
    }

    #[test]
    fn test_empty_record_set() {
        let store = store_with(0);
        let plan = BatchPlan::compute(&store, "Article", 10);
        // MemoryStore has no Article entries at all
        assert!(plan.is_err());

        let mut store = MemoryStore::new();
        store.insert(MemoryRecord::new("Article", 1));
        store.remove("Article", 1);
        let plan = BatchPlan::compute(&store, "Article", 10).unwrap();
        assert_eq!(plan.total_batches, 0);
    }

    #[test]
    fn test_fetch_past_end_is_empty() {
        let store = store_with(5);
        let plan = BatchPlan::compute(&store, "Article", 10).unwrap();
        assert!(plan.fetch(&store, 1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let store = store_with(5);
        assert!(matches!(
            BatchPlan::compute(&store, "Article", 0),
            Err(SyncError::Config(_))
        ));
    }
}
