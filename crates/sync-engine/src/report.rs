//! Run reports: what a sync attempted and how it went.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sync_types::SyncOperation;

/// Terminal (or in-flight) state of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SyncState {
    /// Not started yet.
    Pending,
    /// In flight.
    Running { batch: usize, total: usize },
    /// Every batch succeeded.
    Completed,
    /// The run finished but some batches failed; their records are in
    /// the dirty tracker.
    PartiallyFailed { failed_batches: Vec<usize> },
    /// The pair did not apply to the index, or another run held the pair.
    Skipped,
}

/// Outcome summary for one sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Index the run targeted.
    pub index: String,
    /// Record type the run covered.
    pub type_name: String,
    /// Operation performed.
    pub operation: SyncOperation,
    /// Batches the plan contained.
    pub total_batches: usize,
    /// Batches actually attempted.
    pub batches_attempted: usize,
    /// 0-based indexes of batches whose final attempt failed.
    pub failed_batches: Vec<usize>,
    /// Documents accepted by the backend.
    pub documents_sent: u64,
    /// Records recorded in the dirty tracker by this run.
    pub records_failed: u64,
    /// Where the run ended up.
    pub state: SyncState,
    /// When the run started (milliseconds since epoch).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl SyncReport {
    /// Start a report for a run.
    pub fn start(
        index: impl Into<String>,
        type_name: impl Into<String>,
        operation: SyncOperation,
        total_batches: usize,
    ) -> Self {
        Self {
            index: index.into(),
            type_name: type_name.into(),
            operation,
            total_batches,
            batches_attempted: 0,
            failed_batches: Vec::new(),
            documents_sent: 0,
            records_failed: 0,
            state: SyncState::Pending,
            started_at: Utc::now(),
            elapsed_ms: 0,
        }
    }

    /// A report for a run that never applied and did nothing.
    pub fn skipped(
        index: impl Into<String>,
        type_name: impl Into<String>,
        operation: SyncOperation,
    ) -> Self {
        let mut report = Self::start(index, type_name, operation, 0);
        report.state = SyncState::Skipped;
        report
    }

    /// Record a batch whose documents the backend accepted.
    pub fn record_batch_success(&mut self, documents: u64) {
        self.batches_attempted += 1;
        self.documents_sent += documents;
    }

    /// Record a batch whose final attempt failed.
    pub fn record_batch_failure(&mut self, batch: usize, records: u64) {
        self.batches_attempted += 1;
        self.failed_batches.push(batch);
        self.records_failed += records;
    }

    /// Close the report, fixing its state and elapsed time.
    pub fn finish(&mut self) {
        self.elapsed_ms = (Utc::now() - self.started_at).num_milliseconds().max(0) as u64;
        if self.state == SyncState::Skipped {
            return;
        }
        self.state = if self.failed_batches.is_empty() {
            SyncState::Completed
        } else {
            SyncState::PartiallyFailed {
                failed_batches: self.failed_batches.clone(),
            }
        };
    }

    /// Whether every attempted batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.state == SyncState::Completed
    }
}
