use std::sync::atomic::{AtomicU64, Ordering};

use crate::ids::LocalityId;

/// Process-wide state for one simulated locality, scoped to a single
/// SSSP run (`spec.md` §3.3). Replaces the source's module-level
/// globals: one instance lives per locality inside [`crate::World`],
/// and every action receives the owning locality's context by
/// reference rather than through a thread-local.
pub struct LocalityContext {
    id: LocalityId,
    active_count: AtomicU64,
    finished_count: AtomicU64,
}

impl LocalityContext {
    pub fn new(id: LocalityId) -> Self {
        Self {
            id,
            active_count: AtomicU64::new(0),
            finished_count: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> LocalityId {
        self.id
    }

    /// Records `n` newly-dispatched relaxation tasks as activated.
    pub fn activate(&self, n: u64) {
        self.active_count.fetch_add(n, Ordering::Relaxed);
    }

    /// Records `n` relaxation tasks as finalized.
    pub fn finish(&self, n: u64) {
        self.finished_count.fetch_add(n, Ordering::Relaxed);
    }

    /// A consistent `(active, finished)` snapshot, fenced so that any
    /// finish causally preceding this call is observed (`spec.md` §5).
    pub fn snapshot(&self) -> (u64, u64) {
        std::sync::atomic::fence(Ordering::SeqCst);
        let active = self.active_count.load(Ordering::Relaxed);
        let finished = self.finished_count.load(Ordering::Relaxed);
        (active, finished)
    }

    /// Zeroes the counters, as happens at the start of each SSSP run.
    pub fn reset_counters(&self) {
        self.active_count.store(0, Ordering::Relaxed);
        self.finished_count.store(0, Ordering::Relaxed);
    }
}
