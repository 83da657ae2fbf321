//! Cursor tracking for sync runs.
//!
//! A cursor records how far a full sync has progressed for one
//! (index, record type) pair, enabling interrupted runs to resume at the
//! batch where they stopped. The scheduling harness persists cursors
//! between invocations; only the synchronizer mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress marker for one (index, record type) pair.
///
/// Persisted as JSON so a harness can store it wherever it keeps job state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncCursor {
    /// Name of the index being synced.
    pub index: String,

    /// Record type being synced.
    pub type_name: String,

    /// Next batch to process, 0-based.
    pub current_batch: usize,

    /// Total batches in this run, `ceil(record count / page size)`.
    pub total_batches: usize,

    /// Records processed since this cursor was created.
    pub processed: u64,

    /// When the cursor was last advanced (milliseconds since epoch).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,

    /// When this run started (milliseconds since epoch).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SyncCursor {
    /// Create a cursor at the start of a run.
    pub fn new(index: impl Into<String>, type_name: impl Into<String>, total_batches: usize) -> Self {
        let now = Utc::now();
        Self {
            index: index.into(),
            type_name: type_name.into(),
            current_batch: 0,
            total_batches,
            processed: 0,
            updated_at: now,
            created_at: now,
        }
    }

    /// Create a cursor resuming at a specific batch.
    pub fn at_batch(
        index: impl Into<String>,
        type_name: impl Into<String>,
        total_batches: usize,
        batch: usize,
    ) -> Self {
        let mut cursor = Self::new(index, type_name, total_batches);
        cursor.current_batch = batch;
        cursor
    }

    /// Storage key for this cursor.
    pub fn cursor_key(&self) -> String {
        format!("cursor:{}:{}", self.index, self.type_name)
    }

    /// Advance past the batch that was just attempted.
    pub fn advance(&mut self, records_processed: u64) {
        self.current_batch += 1;
        self.processed += records_processed;
        self.updated_at = Utc::now();
    }

    /// Whether every batch has been attempted.
    pub fn is_exhausted(&self) -> bool {
        self.current_batch >= self.total_batches
    }

    /// Serialize to JSON bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
