//! # sync-engine
//!
//! Batched, resumable synchronization of records into search indexes.
//!
//! ## Key Components
//!
//! - [`SearchBackend`]: Trait the engine drives any search system through
//! - [`BatchPlan`]: Partitions a record set into fixed-size, id-ordered batches
//! - [`Synchronizer`]: Runs full sweeps, targeted updates and dirty retries
//! - [`DirtyTracker`]: Identities whose last sync failed, pending retry
//! - [`PairGuard`]: At most one run per (record type, index) pair
//! - [`SyncReport`]: Outcome summary of a run
//!
//! ## Fault tolerance
//!
//! A batch whose final retry fails never aborts a sweep: its identities
//! go to the [`DirtyTracker`], the cursor advances and the remaining
//! batches still run. A later [`Synchronizer::retry_dirty`] pass resyncs
//! what failed. Cursors serialize to JSON so an interrupted sweep resumes
//! at the batch where it stopped.
//!
//! ## Example
//!
//! ```ignore
//! use sync_engine::{Synchronizer, DirtyTracker};
//! use sync_types::{SyncConfig, SyncOperation};
//!
//! let sync = Synchronizer::new(resolver, SyncConfig::default())
//!     .add_index(index_config);
//! let mut tracker = DirtyTracker::new();
//!
//! let report = sync.sync(&store, &backend, &mut tracker,
//!     "Article", "main", SyncOperation::Update)?;
//! if !report.is_complete() {
//!     sync.retry_dirty(&store, &backend, &mut tracker, "Article", None)?;
//! }
//! ```

pub mod backend;
pub mod dirty;
pub mod error;
pub mod guard;
pub mod planner;
pub mod report;
pub mod sync;

pub use backend::{SearchBackend, MATCH_ALL};
pub use dirty::DirtyTracker;
pub use error::{BackendError, SyncError};
pub use guard::{PairGuard, RunGuard};
pub use planner::BatchPlan;
pub use report::{SyncReport, SyncState};
pub use sync::{BatchOutcome, Synchronizer};
