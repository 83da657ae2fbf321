//! Search documents: the unit sent to the backend per record.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field::{FieldValue, RecordId};

/// Document field carrying the unique key.
pub const KEY_FIELD: &str = "id";
/// Document field carrying the source record identity.
pub const RECORD_ID_FIELD: &str = "record_id";
/// Document field carrying the record's type name.
pub const TYPE_FIELD: &str = "type_name";
/// Document field carrying the record's full type ancestry, root first.
pub const ANCESTRY_FIELD: &str = "type_ancestry";
/// Document field carrying per-viewer visibility markers.
pub const VIEW_STATUS_FIELD: &str = "view_status";

/// Build the stable unique key for a (type, identity) pair.
pub fn document_key(type_name: &str, id: RecordId) -> String {
    format!("{}-{}", type_name, id)
}

/// A document to be upserted into the search backend.
///
/// Fields keep insertion-independent, deterministic ordering so that two
/// builds of the same record compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchDocument {
    /// Unique key, stable and deterministic from (type, identity).
    pub key: String,
    /// Field name to values. Multi-valued fields carry every flattened
    /// value from the related records.
    pub fields: BTreeMap<String, Vec<FieldValue>>,
    /// Per-field boost weights.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub boosts: BTreeMap<String, f32>,
}

impl SearchDocument {
    /// Create an empty document with the given unique key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Append one value to a field, creating the field if absent.
    pub fn add_value(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.entry(field.into()).or_default().push(value);
    }

    /// Append several values to a field.
    pub fn add_values(&mut self, field: impl Into<String>, values: Vec<FieldValue>) {
        if values.is_empty() {
            return;
        }
        self.fields.entry(field.into()).or_default().extend(values);
    }

    /// Attach a boost weight to a field.
    pub fn set_boost(&mut self, field: impl Into<String>, weight: f32) {
        self.boosts.insert(field.into(), weight);
    }

    /// Values for a field, if present.
    pub fn field(&self, name: &str) -> Option<&[FieldValue]> {
        self.fields.get(name).map(|v| v.as_slice())
    }

    /// Boost weight for a field, if one was attached.
    pub fn boost(&self, name: &str) -> Option<f32> {
        self.boosts.get(name).copied()
    }

    /// Whether the document carries any field besides its key.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
