//! Per-type schema declarations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared value type of a field, mirroring the backend's scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer.
    Int,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Timestamp.
    Date,
}

impl FieldKind {
    /// Whether values must be valid numeric literals to be indexed.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Int | FieldKind::Float | FieldKind::Double)
    }
}

/// How two record types relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// One related record.
    HasOne,
    /// Many related records, joined from the far side.
    HasMany,
    /// Many related records through a join table.
    ManyMany,
}

impl RelationKind {
    /// Whether traversing this relation can yield more than one record.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, RelationKind::HasMany | RelationKind::ManyMany)
    }
}

/// A relation declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation kind.
    pub kind: RelationKind,
    /// The related record type.
    pub target: String,
}

/// Declared shape of one record type.
///
/// Relations listed here are "own" declarations only: a subtype inherits
/// its parent's relations at traversal time but must not re-declare them,
/// so relation paths resolve against exactly one declaring type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Type name, unique in the registry.
    pub name: String,

    /// Direct parent type, if any.
    pub parent: Option<String>,

    /// Stored properties and their declared kinds.
    pub fields: BTreeMap<String, FieldKind>,

    /// Computed accessors (getter-backed values) and their declared kinds.
    pub accessors: BTreeMap<String, FieldKind>,

    /// Relations declared directly on this type.
    pub relations: BTreeMap<String, Relation>,
}

impl RecordSchema {
    /// Start a schema for a root type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: BTreeMap::new(),
            accessors: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Set the parent type.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare a stored field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Declare a computed accessor.
    pub fn accessor(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.accessors.insert(name.into(), kind);
        self
    }

    /// Declare a relation to another type.
    pub fn relation(
        mut self,
        name: impl Into<String>,
        kind: RelationKind,
        target: impl Into<String>,
    ) -> Self {
        self.relations.insert(
            name.into(),
            Relation {
                kind,
                target: target.into(),
            },
        );
        self
    }

    /// Declared kind for a field or accessor on this type, if any.
    /// Stored fields win over accessors of the same name.
    pub fn declared_kind(&self, name: &str) -> Option<FieldKind> {
        self.fields
            .get(name)
            .or_else(|| self.accessors.get(name))
            .copied()
    }

    /// A relation declared directly on this type, if any.
    pub fn own_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }
}
