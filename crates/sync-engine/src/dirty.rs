//! The dirty tracker: per-type failed-record bookkeeping.
//!
//! Whenever a batch or a targeted update fails against the backend, the
//! identities involved land here instead of being lost. A later retry
//! pass reads them back out and clears them on success.

use std::collections::BTreeMap;

use tracing::debug;

use sync_types::{DirtyEntry, RecordId};

/// Tracks failed record identities across all record types.
///
/// Serializes to JSON as a map of type name to [`DirtyEntry`], so a
/// harness can persist it alongside its cursors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirtyTracker {
    entries: BTreeMap<String, DirtyEntry>,
}

impl DirtyTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record identities of a type that failed to sync.
    pub fn mark_dirty(&mut self, type_name: &str, ids: impl IntoIterator<Item = RecordId>) {
        let entry = self
            .entries
            .entry(type_name.to_string())
            .or_insert_with(|| DirtyEntry::new(type_name));
        entry.mark_dirty(ids);
        debug!(
            type_name = type_name,
            pending = entry.ids.len(),
            "Marked records dirty"
        );
    }

    /// Record identities that synced successfully.
    ///
    /// A type with no entry stays absent; clean records of a never-failed
    /// type need no bookkeeping.
    pub fn mark_clean(&mut self, type_name: &str, ids: impl IntoIterator<Item = RecordId>) {
        if let Some(entry) = self.entries.get_mut(type_name) {
            entry.mark_clean(ids);
        }
    }

    /// Identities of a type still pending retry, id ascending.
    pub fn list_dirty(&self, type_name: &str) -> Vec<RecordId> {
        self.entries
            .get(type_name)
            .map(|entry| entry.ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The full entry for a type, if one exists.
    pub fn entry(&self, type_name: &str) -> Option<&DirtyEntry> {
        self.entries.get(type_name)
    }

    /// Types that currently have pending identities.
    pub fn dirty_types(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_dirty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether any identity of the type is pending retry.
    pub fn is_dirty(&self, type_name: &str) -> bool {
        self.entries
            .get(type_name)
            .is_some_and(DirtyEntry::is_dirty)
    }

    /// Serialize to JSON bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.entries)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_slice(bytes)?,
        })
    }
}
