//! Error types for schema registration.

use thiserror::Error;

/// Errors raised while building a [`crate::SchemaRegistry`].
///
/// Field resolution itself never errors: an unresolvable field simply
/// yields no path.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type was registered twice.
    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    /// A type names a parent that was never registered.
    #[error("Unknown parent {parent} for type {type_name}")]
    UnknownParent { type_name: String, parent: String },

    /// A relation points at a type that was never registered.
    #[error("Relation {relation} on {type_name} targets unknown type {target}")]
    UnknownRelationTarget {
        type_name: String,
        relation: String,
        target: String,
    },

    /// The parent chain loops back on itself.
    #[error("Parent cycle involving type {0}")]
    ParentCycle(String),
}
