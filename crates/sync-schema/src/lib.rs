//! # sync-schema
//!
//! Static type-model registry and field resolution for searchsync.
//!
//! The type model is declared up front rather than discovered through
//! runtime reflection: a [`SchemaRegistry`] is built once at startup from
//! [`RecordSchema`] declarations and is read-only afterwards. The [`FieldResolver`] turns logical field names
//! (possibly dotted through relations, like `Author.Name`) into concrete
//! [`FieldPath`] extraction recipes, memoizing every resolution.
//!
//! ## Key components
//!
//! - [`RecordSchema`]: one type's declared fields, accessors and relations
//! - [`SchemaRegistry`]: the full hierarchy, with precomputed ancestry
//! - [`FieldResolver`]: logical field name -> [`FieldPath`]
//! - [`PathStep`]: a single extraction step (property read or relation hop)

pub mod error;
pub mod registry;
pub mod resolver;
pub mod schema;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
pub use resolver::{FieldPath, FieldResolver, PathStep};
pub use schema::{FieldKind, RecordSchema, Relation, RelationKind};
