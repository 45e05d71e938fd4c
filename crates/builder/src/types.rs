use std::sync::atomic::{AtomicU32, Ordering};

use atomic::Atomic;

use crate::index::VertexId;
use crate::shared_mut::SharedMut;

/// An edge weight; zero is permitted (`spec.md` §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(pub u64);

/// A tentative or final shortest-path distance. `DIST_INF` means
/// "unreached".
pub type Distance = u64;

pub const DIST_INF: Distance = u64::MAX;

/// An input record: one arc as read from the edge list, consumed by
/// the adjacency-list constructor and discarded before relaxation
/// begins.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub source: VertexId,
    pub dest: VertexId,
    pub weight: Weight,
}

/// A stored outgoing-edge record, written once during the insert phase
/// and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyEdge {
    pub dest: VertexId,
    pub weight: Weight,
}

/// A vertex's adjacency record. Allocated during the constructor's
/// allocate phase with a fixed edge capacity (the vertex's in-degree... no,
/// its out-degree, as accumulated by the count phase); filled during
/// insert; read-only for the rest of the run except for `distance`.
pub struct Vertex {
    write_cursor: AtomicU32,
    distance: Atomic<Distance>,
    edges: Box<[AdjacencyEdge]>,
    edges_ptr: SharedMut<AdjacencyEdge>,
}

// SAFETY: `edges_ptr` is derived once from `edges` while it is still
// uniquely owned, before any concurrent access is possible.
unsafe impl Send for Vertex {}
unsafe impl Sync for Vertex {}

impl Vertex {
    /// Allocates a vertex with room for exactly `capacity` outgoing
    /// edges and `distance = DIST_INF`, per `spec.md` §4.1 "Allocate".
    pub fn with_capacity(capacity: u32) -> Self {
        let mut edges = Vec::with_capacity(capacity as usize);
        // SAFETY: every index in 0..capacity is written exactly once by
        // `insert_edge` before `edges()` is ever read (construction is
        // gated on termination detection), so this is never read
        // uninitialized.
        unsafe { edges.set_len(capacity as usize) };
        let mut edges = edges.into_boxed_slice();
        let edges_ptr = SharedMut::new(edges.as_mut_ptr());
        Self {
            write_cursor: AtomicU32::new(0),
            distance: Atomic::new(DIST_INF),
            edges,
            edges_ptr,
        }
    }

    /// Atomically claims the next write slot and stores `(dest,
    /// weight)` there (`spec.md` §4.1 "Insert"). The write cursor
    /// doubles as `edge_count`: once every edge has been inserted its
    /// final value equals the true out-degree by construction, so no
    /// separate restore step is needed.
    pub fn insert_edge(&self, dest: VertexId, weight: Weight) {
        let idx = self.write_cursor.fetch_add(1, Ordering::AcqRel);
        debug_assert!((idx as usize) < self.edges.len(), "insert exceeded the counted degree");
        unsafe { self.edges_ptr.add(idx as usize).write(AdjacencyEdge { dest, weight }) };
    }

    pub fn edge_count(&self) -> u32 {
        self.write_cursor.load(Ordering::Acquire)
    }

    pub fn edges(&self) -> &[AdjacencyEdge] {
        &self.edges[..self.edge_count() as usize]
    }

    pub fn distance(&self) -> Distance {
        self.distance.load(Ordering::Relaxed)
    }

    /// CAS-guarded update (`spec.md` §4.3): succeeds the first time `d`
    /// improves on the current distance, is a no-op (and reports
    /// failure) once a value `<= d` is observed.
    pub fn try_update_distance(&self, d: Distance) -> bool {
        let mut current = self.distance.load(Ordering::Relaxed);
        while current > d {
            match self
                .distance
                .compare_exchange_weak(current, d, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }

    /// Resets `distance` to `DIST_INF`, as `reset()` broadcasts between
    /// consecutive runs.
    pub fn reset_distance(&self) {
        self.distance.store(DIST_INF, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_edge_places_each_edge_at_a_distinct_slot() {
        let vertex = Vertex::with_capacity(3);
        vertex.insert_edge(VertexId::new(1), Weight(10));
        vertex.insert_edge(VertexId::new(2), Weight(20));
        vertex.insert_edge(VertexId::new(3), Weight(30));

        assert_eq!(vertex.edge_count(), 3);
        let dests: Vec<_> = vertex.edges().iter().map(|e| e.dest.get()).collect();
        let mut sorted = dests.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3]);
    }

    #[test]
    fn try_update_distance_only_accepts_strict_improvements() {
        let vertex = Vertex::with_capacity(0);
        assert!(vertex.try_update_distance(10));
        assert!(vertex.try_update_distance(5));
        assert!(!vertex.try_update_distance(7));
        assert_eq!(vertex.distance(), 5);
    }

    #[test]
    fn reset_distance_restores_infinity() {
        let vertex = Vertex::with_capacity(0);
        vertex.try_update_distance(3);
        vertex.reset_distance();
        assert_eq!(vertex.distance(), DIST_INF);
    }
}
