//! # sync-docs
//!
//! Converts records into search documents.
//!
//! The [`DocumentFactory`] drives one record at a time through the field
//! pipeline: resolve each configured logical field to a
//! [`sync_schema::FieldPath`], interpret the path's steps against the
//! record (flattening multi-valued relations), coerce values to their
//! declared kinds, attach boosts, and add the default metadata every
//! document carries (key, identity, type, ancestry, visibility markers).
//!
//! Field-level problems never fail a build: an unresolvable field is
//! absent from the document, an invalid date or non-numeric value is
//! dropped. Only store access can error.

pub mod coerce;
pub mod error;
pub mod extract;
pub mod factory;
pub mod view;

pub use coerce::coerce;
pub use error::DocumentError;
pub use extract::extract;
pub use factory::DocumentFactory;
pub use view::view_status;
