//! Deterministic in-memory record store.
//!
//! Backs the test suites and small embedders. Records live in BTreeMaps
//! keyed by type and id, so enumeration order is always id ascending.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use sync_types::{FieldValue, RecordId, ViewerId};

use crate::error::StoreError;
use crate::record::Record;
use crate::store::RecordStore;

/// An in-memory record with builder-style construction.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    id: RecordId,
    type_name: String,
    values: BTreeMap<String, FieldValue>,
    links: BTreeMap<String, Vec<(String, RecordId)>>,
    public: bool,
    allowed: BTreeSet<ViewerId>,
}

impl MemoryRecord {
    /// Create a record of a type with an identity. Publicly viewable
    /// until restricted.
    pub fn new(type_name: impl Into<String>, id: RecordId) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            values: BTreeMap::new(),
            links: BTreeMap::new(),
            public: true,
            allowed: BTreeSet::new(),
        }
    }

    /// Set a property value.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Link a related record by (type, id).
    pub fn link(
        mut self,
        relation: impl Into<String>,
        target_type: impl Into<String>,
        id: RecordId,
    ) -> Self {
        self.links
            .entry(relation.into())
            .or_default()
            .push((target_type.into(), id));
        self
    }

    /// Restrict visibility to the explicitly allowed viewers.
    pub fn restricted(mut self) -> Self {
        self.public = false;
        self
    }

    /// Allow a specific viewer to see a restricted record.
    pub fn allow(mut self, viewer: ViewerId) -> Self {
        self.allowed.insert(viewer);
        self
    }
}

impl Record for MemoryRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property(&self, name: &str) -> Option<FieldValue> {
        self.values.get(name).cloned()
    }

    fn can_view(&self, viewer: Option<ViewerId>) -> bool {
        match viewer {
            None => self.public,
            Some(v) => self.public || self.allowed.contains(&v),
        }
    }
}

/// In-memory implementation of [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, BTreeMap<RecordId, MemoryRecord>>,
    viewers: Vec<ViewerId>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same (type, id).
    pub fn insert(&mut self, record: MemoryRecord) {
        self.records
            .entry(record.type_name.clone())
            .or_default()
            .insert(record.id, record);
    }

    /// Register a known viewer.
    pub fn add_viewer(&mut self, viewer: ViewerId) {
        if !self.viewers.contains(&viewer) {
            self.viewers.push(viewer);
        }
    }

    /// Remove a record. Returns whether it existed.
    pub fn remove(&mut self, type_name: &str, id: RecordId) -> bool {
        self.records
            .get_mut(type_name)
            .map(|records| records.remove(&id).is_some())
            .unwrap_or(false)
    }

    fn records_of(&self, type_name: &str) -> Result<&BTreeMap<RecordId, MemoryRecord>, StoreError> {
        self.records
            .get(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn count(&self, type_name: &str) -> Result<usize, StoreError> {
        Ok(self.records_of(type_name)?.len())
    }

    fn fetch(
        &self,
        type_name: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Box<dyn Record>>, StoreError> {
        let page: Vec<Box<dyn Record>> = self
            .records_of(type_name)?
            .values()
            .skip(offset)
            .take(limit)
            .map(|r| Box::new(r.clone()) as Box<dyn Record>)
            .collect();
        debug!(
            type_name = type_name,
            offset = offset,
            limit = limit,
            fetched = page.len(),
            "Fetched record page"
        );
        Ok(page)
    }

    fn fetch_by_ids(
        &self,
        type_name: &str,
        ids: &[RecordId],
    ) -> Result<Vec<Box<dyn Record>>, StoreError> {
        let records = self.records_of(type_name)?;
        let mut sorted: Vec<RecordId> = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Ok(sorted
            .into_iter()
            .filter_map(|id| records.get(&id))
            .map(|r| Box::new(r.clone()) as Box<dyn Record>)
            .collect())
    }

    fn related(
        &self,
        record: &dyn Record,
        relation: &str,
    ) -> Result<Vec<Box<dyn Record>>, StoreError> {
        let source = self
            .records_of(record.type_name())?
            .get(&record.id())
            .ok_or_else(|| StoreError::NotFound {
                type_name: record.type_name().to_string(),
                id: record.id(),
            })?;

        let Some(links) = source.links.get(relation) else {
            return Ok(Vec::new());
        };

        let mut related = Vec::new();
        for (target_type, id) in links {
            if let Some(target) = self.records.get(target_type).and_then(|r| r.get(id)) {
                related.push(Box::new(target.clone()) as Box<dyn Record>);
            }
        }
        Ok(related)
    }

    fn viewers(&self) -> Vec<ViewerId> {
        self.viewers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        for id in [3, 1, 2] {
            store.insert(MemoryRecord::new("Article", id).value("Title", format!("A{}", id)));
        }
        store.insert(MemoryRecord::new("Member", 10).value("Name", "Alice"));
        store.insert(
            MemoryRecord::new("Article", 4)
                .value("Title", "A4")
                .link("Author", "Member", 10),
        );
        store
    }

    #[test]
    fn test_count() {
        assert_eq!(store().count("Article").unwrap(), 4);
        assert!(matches!(
            store().count("Ghost"),
            Err(StoreError::UnknownType(_))
        ));
    }

    #[test]
    fn test_fetch_is_id_ordered() {
        let records = store().fetch("Article", 0, 10).unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_fetch_pagination() {
        let store = store();
        let first = store.fetch("Article", 0, 2).unwrap();
        let second = store.fetch("Article", 2, 2).unwrap();
        assert_eq!(first.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(second.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_fetch_by_ids_skips_missing_and_dedups() {
        let records = store().fetch_by_ids("Article", &[2, 99, 2, 4]).unwrap();
        assert_eq!(records.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_related() {
        let store = store();
        let article = store.fetch_by_ids("Article", &[4]).unwrap().remove(0);
        let related = store.related(article.as_ref(), "Author").unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].property("Name"), Some("Alice".into()));
    }

    #[test]
    fn test_related_unknown_relation_is_empty() {
        let store = store();
        let article = store.fetch_by_ids("Article", &[1]).unwrap().remove(0);
        assert!(store.related(article.as_ref(), "Ghost").unwrap().is_empty());
    }

    #[test]
    fn test_visibility() {
        let public = MemoryRecord::new("Article", 1);
        assert!(public.can_view(None));
        assert!(public.can_view(Some(7)));

        let restricted = MemoryRecord::new("Article", 2).restricted().allow(7);
        assert!(!restricted.can_view(None));
        assert!(restricted.can_view(Some(7)));
        assert!(!restricted.can_view(Some(8)));
    }

    #[test]
    fn test_viewers_dedup() {
        let mut store = MemoryStore::new();
        store.add_viewer(1);
        store.add_viewer(2);
        store.add_viewer(1);
        assert_eq!(store.viewers(), vec![1, 2]);
    }

    #[test]
    fn test_remove() {
        let mut store = store();
        assert!(store.remove("Article", 1));
        assert!(!store.remove("Article", 1));
        assert_eq!(store.count("Article").unwrap(), 3);
    }
}
