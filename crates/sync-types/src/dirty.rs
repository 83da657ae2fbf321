//! Dirty-record state: identities that failed to sync.
//!
//! One entry exists per record type. Failed identities accumulate
//! (deduplicated) across sync attempts and are cleared again when a
//! resync succeeds, with a timestamp recorded on every transition.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::RecordId;

/// Failed-record bookkeeping for one record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirtyEntry {
    /// The record type these identities belong to.
    pub type_name: String,

    /// Identities that failed their last sync attempt. Ordered and
    /// deduplicated so repeat failures do not grow the set.
    pub ids: BTreeSet<RecordId>,

    /// When an identity last failed (milliseconds since epoch).
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub dirty_at: Option<DateTime<Utc>>,

    /// When identities were last successfully resynced.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub clean_at: Option<DateTime<Utc>>,
}

impl DirtyEntry {
    /// Create an empty entry for a record type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ids: BTreeSet::new(),
            dirty_at: None,
            clean_at: None,
        }
    }

    /// Record identities that failed to sync.
    pub fn mark_dirty(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.ids.extend(ids);
        self.dirty_at = Some(Utc::now());
    }

    /// Record identities that synced successfully.
    pub fn mark_clean(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        for id in ids {
            self.ids.remove(&id);
        }
        self.clean_at = Some(Utc::now());
    }

    /// Whether any identity is still pending retry.
    pub fn is_dirty(&self) -> bool {
        !self.ids.is_empty()
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
