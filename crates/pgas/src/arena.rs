use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::RuntimeError;
use crate::ids::{GlobalHandle, LocalityId};
use crate::pin::{PinCell, PinGuard};

/// A per-locality heap of individually-allocated, variable-shaped
/// records, addressed by [`GlobalHandle`]. Backs the vertex arena: each
/// `Vertex` is allocated once, during the adjacency list's allocate
/// phase, on the locality that owns its `IndexArray` slot.
pub struct Arena<T> {
    localities: Vec<LocalityArena<T>>,
}

struct LocalityArena<T> {
    next_offset: AtomicU64,
    records: DashMap<u64, Arc<PinCell<T>>>,
}

impl<T> Arena<T> {
    pub fn new(localities: u32) -> Self {
        Self {
            localities: (0..localities)
                .map(|_| LocalityArena {
                    next_offset: AtomicU64::new(0),
                    records: DashMap::new(),
                })
                .collect(),
        }
    }

    /// Allocates `value` on `locality` and returns its handle.
    pub fn alloc(&self, locality: LocalityId, value: T) -> GlobalHandle {
        let arena = &self.localities[locality.get() as usize];
        let offset = arena.next_offset.fetch_add(1, Ordering::Relaxed);
        arena.records.insert(offset, Arc::new(PinCell::new(value)));
        GlobalHandle::new(locality, offset)
    }

    pub fn pin(&self, handle: GlobalHandle) -> Result<PinGuard<T>, RuntimeError> {
        let arena = &self.localities[handle.locality.get() as usize];
        let cell = arena
            .records
            .get(&handle.offset)
            .ok_or(RuntimeError::InvalidHandle)?;
        PinCell::try_pin(&cell)
    }

    /// Shared access to the record at `handle`, bypassing the exclusive
    /// pin gate entirely. For records whose own fields are already safe
    /// under concurrent access (an atomically fetch-added write cursor, a
    /// CAS-guarded distance), no caller-side exclusivity is needed: the
    /// insert phase inserts many edges into the same vertex concurrently
    /// and must never contend on `pin` for it.
    pub fn access(&self, handle: GlobalHandle) -> Result<Arc<PinCell<T>>, RuntimeError> {
        let arena = &self.localities[handle.locality.get() as usize];
        arena
            .records
            .get(&handle.offset)
            .map(|entry| Arc::clone(&entry))
            .ok_or(RuntimeError::InvalidHandle)
    }

    pub fn free(&self, handle: GlobalHandle) {
        let arena = &self.localities[handle.locality.get() as usize];
        arena.records.remove(&handle.offset);
    }

    pub fn len(&self) -> usize {
        self.localities.iter().map(|a| a.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
