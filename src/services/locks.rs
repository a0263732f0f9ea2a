//! Per-PR lock registry.
//!
//! Merge and reassignment are read-then-write sequences against one PR; two
//! of them racing on the same PR id must not both act on a stale view. The
//! registry hands out one async mutex per PR id, so mutations on the same PR
//! serialize while different PRs proceed in parallel.
//!
//! Entries are never evicted. The registry lives for the process lifetime and
//! PR ids are low-cardinality compared to the rows they guard.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry of per-PR mutexes.
#[derive(Default)]
pub struct PrLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PrLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the mutex guarding the given PR id, creating it on first use.
    ///
    /// The returned Arc keeps the mutex alive across the caller's critical
    /// section even if the map entry were removed concurrently.
    pub fn lock_for(&self, pull_request_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(pull_request_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
