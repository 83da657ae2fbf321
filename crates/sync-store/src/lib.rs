//! # sync-store
//!
//! The record store seam for searchsync.
//!
//! The engine never talks to a database directly; it consumes the two
//! traits in this crate:
//!
//! - [`Record`]: one typed record (identity, property reads, visibility)
//! - [`RecordStore`]: counted, identity-ordered pagination plus relation
//!   traversal and viewer enumeration
//!
//! [`MemoryStore`] is a deterministic in-memory implementation used by
//! the test suites and by embedders without a real store.

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use memory::{MemoryRecord, MemoryStore};
pub use record::Record;
pub use store::RecordStore;
