//! The document factory: one record in, one search document out.

use std::sync::Arc;

use tracing::{debug, trace};

use sync_schema::FieldResolver;
use sync_store::{Record, RecordStore};
use sync_types::document::{
    ANCESTRY_FIELD, KEY_FIELD, RECORD_ID_FIELD, TYPE_FIELD, VIEW_STATUS_FIELD,
};
use sync_types::{document_key, FieldValue, IndexConfig, SearchDocument};

use crate::coerce::coerce_values;
use crate::error::DocumentError;
use crate::extract::extract;
use crate::view::view_status;

/// Builds search documents for an index's configured fields.
pub struct DocumentFactory {
    resolver: Arc<FieldResolver>,
}

impl DocumentFactory {
    /// Create a factory over a resolver.
    pub fn new(resolver: Arc<FieldResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver this factory uses.
    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    /// Build the document for one record.
    ///
    /// Unresolvable fields and invalid values are simply absent from the
    /// result; only store access can fail.
    pub fn build(
        &self,
        record: &dyn Record,
        index: &IndexConfig,
        store: &dyn RecordStore,
    ) -> Result<SearchDocument, DocumentError> {
        let type_name = record.type_name();
        let mut doc = SearchDocument::new(document_key(type_name, record.id()));
        self.add_default_fields(&mut doc, record, store);

        for field in index.fields_for_indexing() {
            let Some(path) = self.resolver.resolve(type_name, &field) else {
                trace!(type_name = type_name, field = %field, "Field not resolvable, skipping");
                continue;
            };

            // A path only applies to records of its origin type or below
            if !self.resolver.registry().is_a(type_name, &path.origin) {
                continue;
            }

            let raw = extract(store, record, &path)?;
            let values = coerce_values(raw, path.kind);
            doc.add_values(path.name.clone(), values);

            if let Some(weight) = index.boost_for(&field) {
                doc.set_boost(path.name.clone(), weight);
            }
        }

        Ok(doc)
    }

    /// Build documents for a batch of records.
    ///
    /// Each record's working set is dropped as soon as its document is
    /// built, keeping long bulk passes memory-bounded.
    pub fn build_batch(
        &self,
        records: &[Box<dyn Record>],
        index: &IndexConfig,
        store: &dyn RecordStore,
    ) -> Result<Vec<SearchDocument>, DocumentError> {
        let mut docs = Vec::with_capacity(records.len());
        for record in records {
            docs.push(self.build(record.as_ref(), index, store)?);
        }
        debug!(
            index = %index.name,
            documents = docs.len(),
            "Built document batch"
        );
        Ok(docs)
    }

    fn add_default_fields(
        &self,
        doc: &mut SearchDocument,
        record: &dyn Record,
        store: &dyn RecordStore,
    ) {
        let type_name = record.type_name();
        doc.add_value(KEY_FIELD, FieldValue::Text(doc.key.clone()));
        doc.add_value(RECORD_ID_FIELD, FieldValue::Int(record.id() as i64));
        doc.add_value(TYPE_FIELD, FieldValue::Text(type_name.to_string()));
        if let Some(ancestry) = self.resolver.registry().ancestry(type_name) {
            doc.add_values(
                ANCESTRY_FIELD,
                ancestry
                    .iter()
                    .map(|t| FieldValue::Text(t.clone()))
                    .collect(),
            );
        }
        doc.add_values(VIEW_STATUS_FIELD, view_status(record, store));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_schema::{FieldKind, RecordSchema, RelationKind, SchemaRegistry};
    use sync_store::{MemoryRecord, MemoryStore};

    fn factory() -> DocumentFactory {
        let registry = SchemaRegistry::build([
            RecordSchema::new("Page")
                .field("Title", FieldKind::Text)
                .field("Created", FieldKind::Date),
            RecordSchema::new("Article")
                .with_parent("Page")
                .field("Body", FieldKind::Text)
                .field("Views", FieldKind::Int)
                .relation("Author", RelationKind::HasOne, "Member")
                .relation("Tags", RelationKind::ManyMany, "Tag"),
            RecordSchema::new("Member").field("Name", FieldKind::Text),
            RecordSchema::new("Tag").field("Label", FieldKind::Text),
        ])
        .unwrap();
        DocumentFactory::new(Arc::new(FieldResolver::new(Arc::new(registry))))
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(MemoryRecord::new("Member", 5).value("Name", "Alice"));
        store.insert(MemoryRecord::new("Tag", 1).value("Label", "rust"));
        store.insert(MemoryRecord::new("Tag", 2).value("Label", "search"));
        store.insert(
            MemoryRecord::new("Article", 7)
                .value("Title", "Home")
                .value("Body", "Welcome")
                .value("Created", "2020-05-04 12:30:00")
                .value("Views", "120")
                .link("Author", "Member", 5)
                .link("Tags", "Tag", 1)
                .link("Tags", "Tag", 2),
        );
        store
    }

    fn index() -> IndexConfig {
        IndexConfig::new("main")
            .add_class("Page")
            .add_boosted_field("Title", 5.0)
            .add_fulltext_field("Body")
            .add_fulltext_field("Author.Name")
            .add_fulltext_field("Tags.Label")
            .add_filter_field("Views")
            .add_sort_field("Created")
    }

    fn build() -> SearchDocument {
        let factory = factory();
        let store = store();
        let record = store.fetch_by_ids("Article", &[7]).unwrap().remove(0);
        factory.build(record.as_ref(), &index(), &store).unwrap()
    }

    #[test]
    fn test_default_metadata() {
        let doc = build();
        assert_eq!(doc.key, "Article-7");
        assert_eq!(doc.field(KEY_FIELD).unwrap(), &["Article-7".into()]);
        assert_eq!(doc.field(RECORD_ID_FIELD).unwrap(), &[FieldValue::Int(7)]);
        assert_eq!(doc.field(TYPE_FIELD).unwrap(), &["Article".into()]);
        assert_eq!(
            doc.field(ANCESTRY_FIELD).unwrap(),
            &["Page".into(), "Article".into()]
        );
        assert_eq!(doc.field(VIEW_STATUS_FIELD).unwrap(), &["1-null".into()]);
    }

    #[test]
    fn test_fields_use_origin_prefixed_names() {
        let doc = build();
        assert_eq!(doc.field("Page_Title").unwrap(), &["Home".into()]);
        assert_eq!(doc.field("Article_Body").unwrap(), &["Welcome".into()]);
    }

    #[test]
    fn test_boost_attached_to_resolved_field() {
        let doc = build();
        assert_eq!(doc.boost("Page_Title"), Some(5.0));
        assert_eq!(doc.boost("Article_Body"), None);
    }

    #[test]
    fn test_date_coerced_to_wire_format() {
        let doc = build();
        let rendered: Vec<String> = doc
            .field("Page_Created")
            .unwrap()
            .iter()
            .map(|v| v.render())
            .collect();
        assert_eq!(rendered, vec!["2020-05-04T12:30:00Z"]);
    }

    #[test]
    fn test_numeric_string_coerced() {
        let doc = build();
        assert_eq!(doc.field("Article_Views").unwrap(), &[FieldValue::Int(120)]);
    }

    #[test]
    fn test_relation_values_flattened() {
        let doc = build();
        assert_eq!(
            doc.field("Article_Author_Name").unwrap(),
            &["Alice".into()]
        );
        assert_eq!(
            doc.field("Article_Tags_Label").unwrap(),
            &["rust".into(), "search".into()]
        );
    }

    #[test]
    fn test_null_date_absent_from_document() {
        let factory = factory();
        let mut store = store();
        store.insert(MemoryRecord::new("Article", 8).value("Title", "NoDate").value("Created", ""));
        let record = store.fetch_by_ids("Article", &[8]).unwrap().remove(0);
        let doc = factory.build(record.as_ref(), &index(), &store).unwrap();
        assert!(doc.field("Page_Created").is_none());
    }

    #[test]
    fn test_invalid_numeric_absent_from_document() {
        let factory = factory();
        let mut store = store();
        store.insert(MemoryRecord::new("Article", 9).value("Views", "many"));
        let record = store.fetch_by_ids("Article", &[9]).unwrap().remove(0);
        let doc = factory.build(record.as_ref(), &index(), &store).unwrap();
        assert!(doc.field("Article_Views").is_none());
    }

    #[test]
    fn test_subtype_field_gated_by_origin() {
        // A Page record never receives Article-declared fields even
        // though the path resolves through the hierarchy.
        let factory = factory();
        let mut store = store();
        store.insert(MemoryRecord::new("Page", 1).value("Title", "Root").value("Body", "never"));
        let record = store.fetch_by_ids("Page", &[1]).unwrap().remove(0);
        let doc = factory.build(record.as_ref(), &index(), &store).unwrap();
        assert_eq!(doc.field("Page_Title").unwrap(), &["Root".into()]);
        assert!(doc.field("Article_Body").is_none());
    }

    #[test]
    fn test_document_serializes_dates_in_wire_format() {
        let json = serde_json::to_string(&build()).unwrap();
        assert!(json.contains("\"2020-05-04T12:30:00Z\""));
        assert!(json.contains("\"Article-7\""));
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build(), build());
    }

    #[test]
    fn test_build_batch() {
        let factory = factory();
        let store = store();
        let records = store.fetch("Article", 0, 10).unwrap();
        let docs = factory.build_batch(&records, &index(), &store).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].key, "Article-7");
    }

    #[test]
    fn test_restricted_record_view_status() {
        let factory = factory();
        let mut store = store();
        store.add_viewer(3);
        store.add_viewer(4);
        store.insert(MemoryRecord::new("Article", 10).restricted().allow(4));
        let record = store.fetch_by_ids("Article", &[10]).unwrap().remove(0);
        let doc = factory.build(record.as_ref(), &index(), &store).unwrap();
        assert_eq!(
            doc.field(VIEW_STATUS_FIELD).unwrap(),
            &["0-3".into(), "1-4".into()]
        );
    }
}
