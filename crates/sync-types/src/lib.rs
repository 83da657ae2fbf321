//! # sync-types
//!
//! Shared domain types for the searchsync indexing engine.
//!
//! This crate defines the data structures passed between the schema
//! registry, the document builder and the synchronizer:
//! - [`FieldValue`]: a typed value extracted from a record
//! - [`SearchDocument`]: the unit submitted to the search backend
//! - [`SyncCursor`]: persisted progress marker per (index, record type)
//! - [`DirtyEntry`]: record identities that failed to sync, pending retry
//! - [`IndexConfig`]: a named index definition (classes, fields, boosts)
//! - [`SyncConfig`]: engine tuning, loaded in layers (defaults, file, env)

pub mod config;
pub mod cursor;
pub mod dirty;
pub mod document;
pub mod field;
pub mod index;
pub mod operation;

pub use config::{ConfigError, SyncConfig};
pub use cursor::SyncCursor;
pub use dirty::DirtyEntry;
pub use document::{document_key, SearchDocument};
pub use field::{FieldValue, RecordId, ViewerId};
pub use index::IndexConfig;
pub use operation::SyncOperation;
