//! The synchronizer: drives full sweeps and targeted updates against a
//! search backend.
//!
//! A full sweep plans batches over one (record type, index) pair and
//! pushes them with a commit after each batch. A batch whose final retry
//! fails never aborts the sweep: its identities go to the dirty tracker,
//! the cursor advances and the run continues, so one bad batch cannot
//! starve the batches behind it.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use sync_docs::DocumentFactory;
use sync_schema::FieldResolver;
use sync_store::{Record, RecordStore, StoreError};
use sync_types::{document_key, IndexConfig, RecordId, SyncConfig, SyncCursor, SyncOperation};

use crate::backend::{SearchBackend, MATCH_ALL};
use crate::dirty::DirtyTracker;
use crate::error::SyncError;
use crate::planner::BatchPlan;
use crate::report::{SyncReport, SyncState};

/// Result of pushing one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 0-based index of the batch that was attempted.
    pub batch: usize,
    /// Records the batch contained.
    pub records: u64,
    /// Whether the backend accepted the batch.
    pub succeeded: bool,
}

/// Drives synchronization of record types into configured indexes.
pub struct Synchronizer {
    factory: DocumentFactory,
    indexes: Vec<IndexConfig>,
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer with no indexes configured.
    pub fn new(resolver: Arc<FieldResolver>, config: SyncConfig) -> Self {
        Self {
            factory: DocumentFactory::new(resolver),
            indexes: Vec::new(),
            config,
        }
    }

    /// Register an index configuration.
    pub fn add_index(mut self, index: IndexConfig) -> Self {
        self.indexes.push(index);
        self
    }

    /// The configured indexes.
    pub fn indexes(&self) -> &[IndexConfig] {
        &self.indexes
    }

    /// Look up a configured index by name.
    pub fn index_named(&self, name: &str) -> Result<&IndexConfig, SyncError> {
        self.indexes
            .iter()
            .find(|index| index.name == name)
            .ok_or_else(|| SyncError::UnknownIndex(name.to_string()))
    }

    /// Whether an index covers a record type, directly or through the
    /// type's hierarchy.
    pub fn applies(&self, index: &IndexConfig, type_name: &str) -> bool {
        self.factory
            .resolver()
            .registry()
            .hierarchy(type_name, true)
            .is_some_and(|hierarchy| index.covers_any(hierarchy))
    }

    /// Plan a fresh cursor for a full sweep of a (record type, index)
    /// pair, partitioning the current record set into batches.
    pub fn plan_cursor(
        &self,
        store: &dyn RecordStore,
        type_name: &str,
        index: &str,
    ) -> Result<SyncCursor, SyncError> {
        self.index_named(index)?;
        let plan = BatchPlan::compute(store, type_name, self.config.batch_size)?;
        Ok(SyncCursor::new(index, type_name, plan.total_batches))
    }

    /// Run a full sweep of one (record type, index) pair.
    ///
    /// `DeleteAll` clears the index with a single match-all query and
    /// builds nothing. A pair the index does not cover yields a skipped
    /// report without touching the backend.
    pub fn sync(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        tracker: &mut DirtyTracker,
        type_name: &str,
        index: &str,
        operation: SyncOperation,
    ) -> Result<SyncReport, SyncError> {
        let index_config = self.index_named(index)?;

        if operation == SyncOperation::DeleteAll {
            return self.delete_all(backend, type_name, index);
        }

        if !self.applies(index_config, type_name) {
            debug!(
                type_name = type_name,
                index = index,
                "Index does not cover type, skipping"
            );
            let mut report = SyncReport::skipped(index, type_name, operation);
            report.finish();
            return Ok(report);
        }

        let mut cursor = self.plan_cursor(store, type_name, index)?;
        self.run(store, backend, tracker, &mut cursor, operation)
    }

    /// Run a sweep to exhaustion from an existing cursor.
    ///
    /// A cursor persisted mid-run resumes exactly where it stopped;
    /// already-attempted batches are never re-fetched.
    pub fn run(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        tracker: &mut DirtyTracker,
        cursor: &mut SyncCursor,
        operation: SyncOperation,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::start(
            cursor.index.clone(),
            cursor.type_name.clone(),
            operation,
            cursor.total_batches,
        );
        report.state = SyncState::Running {
            batch: cursor.current_batch,
            total: cursor.total_batches,
        };
        info!(
            type_name = %cursor.type_name,
            index = %cursor.index,
            operation = %operation,
            total_batches = cursor.total_batches,
            starting_batch = cursor.current_batch,
            "Starting sync run"
        );

        let mut commits = 0usize;
        while !cursor.is_exhausted() {
            let outcome = self.sync_step(store, backend, tracker, cursor, operation)?;
            if outcome.succeeded {
                report.record_batch_success(outcome.records);
                commits += 1;
                if self.config.optimize_every > 0 && commits % self.config.optimize_every == 0 {
                    if let Err(error) = backend.optimize(&cursor.index) {
                        warn!(index = %cursor.index, error = %error, "Optimize failed");
                    }
                }
            } else {
                report.record_batch_failure(outcome.batch, outcome.records);
            }
        }

        report.finish();
        info!(
            type_name = %report.type_name,
            index = %report.index,
            documents_sent = report.documents_sent,
            records_failed = report.records_failed,
            elapsed_ms = report.elapsed_ms,
            complete = report.is_complete(),
            "Sync run finished"
        );
        Ok(report)
    }

    /// Process the batch under the cursor and advance past it.
    ///
    /// The cursor advances whether the batch succeeded or not; a failed
    /// batch leaves its identities in the dirty tracker instead of
    /// blocking the sweep. Exposed so a step-driven harness can spread a
    /// sweep over many invocations.
    pub fn sync_step(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        tracker: &mut DirtyTracker,
        cursor: &mut SyncCursor,
        operation: SyncOperation,
    ) -> Result<BatchOutcome, SyncError> {
        if cursor.is_exhausted() {
            return Err(SyncError::Config("cursor is exhausted".to_string()));
        }
        if operation == SyncOperation::DeleteAll {
            return Err(SyncError::Config(
                "deleteall targets a whole index, not batches".to_string(),
            ));
        }

        let batch = cursor.current_batch;
        let index_config = self.index_named(&cursor.index)?;
        let offset = batch.saturating_mul(self.config.batch_size);
        let records = store.fetch(&cursor.type_name, offset, self.config.batch_size)?;
        let record_count = records.len() as u64;
        if records.is_empty() {
            cursor.advance(0);
            return Ok(BatchOutcome {
                batch,
                records: 0,
                succeeded: true,
            });
        }

        let ids: Vec<RecordId> = records.iter().map(|record| record.id()).collect();
        let succeeded =
            self.push_batch(store, backend, index_config, &cursor.type_name, &records, operation)?;

        if succeeded {
            tracker.mark_clean(&cursor.type_name, ids);
        } else {
            tracker.mark_dirty(&cursor.type_name, ids);
        }
        cursor.advance(record_count);
        Ok(BatchOutcome {
            batch,
            records: record_count,
            succeeded,
        })
    }

    /// Targeted manipulation of specific records, outside any sweep.
    ///
    /// The records are applied to every configured index covering the
    /// type (or only the named one). Backend failures do not error: the
    /// identities are marked dirty for a later retry pass and the call
    /// returns normally.
    pub fn update_records(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        tracker: &mut DirtyTracker,
        type_name: &str,
        ids: &[RecordId],
        operation: SyncOperation,
        index: Option<&str>,
    ) -> Result<(), SyncError> {
        if ids.is_empty() {
            return Err(SyncError::EmptyRecordSet);
        }
        if operation == SyncOperation::DeleteAll {
            return Err(SyncError::Config(
                "deleteall targets a whole index, not records".to_string(),
            ));
        }
        let registry = self.factory.resolver().registry();
        let hierarchy = registry
            .hierarchy(type_name, true)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;

        let targets: Vec<&IndexConfig> = match index {
            Some(name) => vec![self.index_named(name)?],
            None => self.indexes.iter().collect(),
        };

        let ids: Vec<RecordId> = {
            let unique: BTreeSet<RecordId> = ids.iter().copied().collect();
            unique.into_iter().collect()
        };

        let records = if operation.builds_documents() {
            store.fetch_by_ids(type_name, &ids)?
        } else {
            Vec::new()
        };

        for target in targets {
            if !target.covers_any(hierarchy) {
                continue;
            }
            let succeeded = if operation.builds_documents() {
                self.push_batch(store, backend, target, type_name, &records, operation)?
            } else {
                let keys: Vec<String> =
                    ids.iter().map(|id| document_key(type_name, *id)).collect();
                self.push_keys(backend, target, &keys)
            };
            if succeeded {
                tracker.mark_clean(type_name, ids.iter().copied());
            } else {
                tracker.mark_dirty(type_name, ids.iter().copied());
            }
        }
        Ok(())
    }

    /// Resync every dirty identity of a type.
    ///
    /// Identities still present in the store are re-indexed; identities
    /// deleted since they were marked are removed from the index by key.
    /// Returns how many identities were cleaned.
    pub fn retry_dirty(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        tracker: &mut DirtyTracker,
        type_name: &str,
        index: Option<&str>,
    ) -> Result<usize, SyncError> {
        let pending = tracker.list_dirty(type_name);
        if pending.is_empty() {
            return Ok(0);
        }
        info!(
            type_name = type_name,
            pending = pending.len(),
            "Retrying dirty records"
        );

        let present: BTreeSet<RecordId> = store
            .fetch_by_ids(type_name, &pending)?
            .iter()
            .map(|record| record.id())
            .collect();
        let missing: Vec<RecordId> = pending
            .iter()
            .copied()
            .filter(|id| !present.contains(id))
            .collect();

        if !present.is_empty() {
            let present: Vec<RecordId> = present.into_iter().collect();
            self.update_records(
                store,
                backend,
                tracker,
                type_name,
                &present,
                SyncOperation::Update,
                index,
            )?;
        }
        if !missing.is_empty() {
            self.update_records(
                store,
                backend,
                tracker,
                type_name,
                &missing,
                SyncOperation::Delete,
                index,
            )?;
        }

        let remaining = tracker.list_dirty(type_name).len();
        Ok(pending.len() - remaining)
    }

    fn delete_all(
        &self,
        backend: &dyn SearchBackend,
        type_name: &str,
        index: &str,
    ) -> Result<SyncReport, SyncError> {
        info!(index = index, "Clearing index");
        backend.delete_by_query(index, MATCH_ALL)?;
        backend.commit(index)?;
        let mut report = SyncReport::start(index, type_name, SyncOperation::DeleteAll, 0);
        report.finish();
        Ok(report)
    }

    /// Push one batch with the configured retry budget. `Ok(false)` means
    /// the final attempt failed; only store or document errors propagate.
    fn push_batch(
        &self,
        store: &dyn RecordStore,
        backend: &dyn SearchBackend,
        index: &IndexConfig,
        type_name: &str,
        records: &[Box<dyn Record>],
        operation: SyncOperation,
    ) -> Result<bool, SyncError> {
        if operation.builds_documents() {
            let documents = self.factory.build_batch(records, index, store)?;
            let attempts = 1 + self.config.max_batch_retries;
            for attempt in 1..=attempts {
                match backend
                    .add_documents(&index.name, &documents)
                    .and_then(|()| backend.commit(&index.name))
                {
                    Ok(()) => return Ok(true),
                    Err(error) => warn!(
                        index = %index.name,
                        type_name = type_name,
                        attempt = attempt,
                        attempts = attempts,
                        error = %error,
                        "Batch push failed"
                    ),
                }
            }
            Ok(false)
        } else {
            let keys: Vec<String> = records
                .iter()
                .map(|record| document_key(type_name, record.id()))
                .collect();
            Ok(self.push_keys(backend, index, &keys))
        }
    }

    fn push_keys(&self, backend: &dyn SearchBackend, index: &IndexConfig, keys: &[String]) -> bool {
        let attempts = 1 + self.config.max_batch_retries;
        for attempt in 1..=attempts {
            match backend
                .delete_by_key(&index.name, keys)
                .and_then(|()| backend.commit(&index.name))
            {
                Ok(()) => return true,
                Err(error) => warn!(
                    index = %index.name,
                    attempt = attempt,
                    attempts = attempts,
                    error = %error,
                    "Batch delete failed"
                ),
            }
        }
        false
    }
}
