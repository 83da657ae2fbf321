//! Overlap protection for sync runs.
//!
//! At most one sync may run per (record type, index) pair at a time. A
//! harness that ticks on a schedule can find the previous run still in
//! flight; acquiring the pair's guard first makes the new tick a no-op
//! instead of a concurrent second run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

/// Tracks which (record type, index) pairs currently have a sync running.
///
/// Acquisition is lock-free once a pair's flag exists; the inner map is
/// only locked to create or look up flags.
#[derive(Default)]
pub struct PairGuard {
    flags: Mutex<HashMap<(String, String), Arc<AtomicBool>>>,
}

impl PairGuard {
    /// Create a guard with no running pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to start a run for a (record type, index) pair.
    ///
    /// Returns `None` if a run for the pair is already in flight. The
    /// returned [`RunGuard`] releases the pair when dropped, including on
    /// panic.
    pub fn try_acquire(&self, type_name: &str, index: &str) -> Option<RunGuard> {
        let flag = self.flag_for(type_name, index);
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(RunGuard { flag })
        } else {
            debug!(
                type_name = type_name,
                index = index,
                "Sync already running for pair, skipping"
            );
            None
        }
    }

    /// Whether a run for the pair is currently in flight.
    pub fn is_running(&self, type_name: &str, index: &str) -> bool {
        self.flag_for(type_name, index).load(Ordering::SeqCst)
    }

    fn flag_for(&self, type_name: &str, index: &str) -> Arc<AtomicBool> {
        let mut flags = self.lock_flags();
        flags
            .entry((type_name.to_string(), index.to_string()))
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone()
    }

    fn lock_flags(&self) -> MutexGuard<'_, HashMap<(String, String), Arc<AtomicBool>>> {
        // A poisoned map still holds valid flags
        self.flags
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// RAII guard releasing a pair's running flag when dropped.
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
