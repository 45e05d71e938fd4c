use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use pgas::{AndLco, Arena, GlobalArray, GlobalHandle, LocalityId, PinCell, PinGuard, World};
use termination::Detector;

use crate::edge_list::EdgeList;
use crate::error::BuilderError;
use crate::types::Vertex;

const UNALLOCATED: u64 = u64::MAX;

/// The distributed adjacency list (`spec.md` §4.1 output contract):
/// `index` slot `i` names the [`Vertex`] record holding exactly vertex
/// `i`'s outgoing edges. Built in three phases (count, allocate,
/// insert), dispatched through [`pgas::World`] and gated by
/// [`termination::Detector`], grounded on
/// `original_source/apps/libPXGL/src/adjacency_list.c` and the CSR
/// constructor pattern used for parallel degree-count/allocate/insert
/// graph construction.
pub struct AdjacencyList<W: World> {
    world: Arc<W>,
    index: GlobalArray<AtomicU64>,
    vertices: Arena<Vertex>,
    num_vertices: u64,
}

impl<W: World> AdjacencyList<W> {
    /// Runs the count/allocate/insert pipeline described in `spec.md`
    /// §4.1 and blocks until the adjacency list is fully populated.
    pub fn build(world: &Arc<W>, edges: &EdgeList) -> Result<Self, BuilderError> {
        let num_vertices = edges.num_vertices();
        for edge in edges.iter() {
            if edge.source.get() >= num_vertices {
                return Err(BuilderError::VertexOutOfRange {
                    endpoint: edge.source.get(),
                    num_vertices,
                });
            }
            if edge.dest.get() >= num_vertices {
                return Err(BuilderError::VertexOutOfRange {
                    endpoint: edge.dest.get(),
                    num_vertices,
                });
            }
        }

        let localities = world.locality_count() as u64;
        let block_size = num_vertices.div_ceil(localities.max(1)).max(1);
        let num_edges = edges.len() as u64;
        log::info!(
            "building adjacency list: {num_vertices} vertices, {num_edges} edges, {localities} localities"
        );

        // Phase 1: count. Every edge fetch-adds its source vertex's
        // counter; counters are plain atomics, not pinned records, since
        // many edges concurrently share one source and must never
        // contend on exclusive access (`spec.md` §5).
        let counts: GlobalArray<AtomicU32> =
            GlobalArray::from_fn(num_vertices, block_size, localities as u32, |_| AtomicU32::new(0));
        world.broadcast(|ctx| ctx.reset_counters());
        if num_edges > 0 {
            world.context(LocalityId::new(0)).activate(num_edges);
        }
        world.range_call(num_edges, |i| {
            let edge = edges.get(i as usize);
            let target = counts.owning_locality(edge.source.get());
            world.call_sync(target, |ctx| {
                counts.get(edge.source.get()).fetch_add(1, Ordering::AcqRel);
                ctx.finish(1);
            });
        });
        Detector::detect(world);

        // Phase 2: allocate. One Vertex per index slot, sized to its
        // counted out-degree, on the locality that owns the slot. The
        // source signals a shared and-reduction LCO here rather than the
        // termination detector (`spec.md` §4.1 "Allocate").
        let index: GlobalArray<AtomicU64> =
            GlobalArray::from_fn(num_vertices, block_size, localities as u32, |_| {
                AtomicU64::new(UNALLOCATED)
            });
        let vertices: Arena<Vertex> = Arena::new(localities as u32);
        let and_lco = AndLco::new(num_vertices);
        world.range_call(num_vertices, |i| {
            let owner = index.owning_locality(i);
            let degree = counts.get(i).load(Ordering::Acquire);
            world.call_sync(owner, |_ctx| {
                let handle = vertices.alloc(owner, Vertex::with_capacity(degree));
                index.get(i).store(handle.offset, Ordering::Release);
                and_lco.set();
            });
        });
        and_lco.wait();

        // Phase 3: insert. Each edge fetch-adds a write slot in its
        // source vertex's (already-allocated) edge buffer and writes
        // `(dest, weight)` there. `Arena::access` is used instead of
        // `Arena::pin`: many edges concurrently target the same vertex,
        // and `Vertex::insert_edge`'s own write-cursor fetch-add already
        // makes that safe without an exclusivity handshake.
        world.broadcast(|ctx| ctx.reset_counters());
        if num_edges > 0 {
            world.context(LocalityId::new(0)).activate(num_edges);
        }
        world.range_call(num_edges, |i| {
            let edge = edges.get(i as usize);
            let owner = index.owning_locality(edge.source.get());
            world.call_sync(owner, |ctx| {
                let offset = index.get(edge.source.get()).load(Ordering::Acquire);
                debug_assert_ne!(offset, UNALLOCATED, "vertex not yet allocated");
                let handle = GlobalHandle::new(owner, offset);
                let vertex = vertices
                    .access(handle)
                    .expect("vertex handle is valid for the lifetime of the adjacency list");
                vertex.get().insert_edge(edge.dest, edge.weight);
                ctx.finish(1);
            });
        });
        Detector::detect(world);
        log::info!("adjacency list built");

        Ok(Self {
            world: Arc::clone(world),
            index,
            vertices,
            num_vertices,
        })
    }

    pub fn world(&self) -> &Arc<W> {
        &self.world
    }

    pub fn num_vertices(&self) -> u64 {
        self.num_vertices
    }

    pub fn owning_locality(&self, vid: u64) -> LocalityId {
        self.index.owning_locality(vid)
    }

    fn vertex_handle(&self, vid: u64) -> Result<GlobalHandle, BuilderError> {
        let owner = self.index.owning_locality(vid);
        let offset = self.index.get(vid).load(Ordering::Acquire);
        if offset == UNALLOCATED {
            return Err(BuilderError::Runtime(pgas::RuntimeError::InvalidHandle));
        }
        Ok(GlobalHandle::new(owner, offset))
    }

    /// Shared access to vertex `vid`'s record.
    pub fn vertex(&self, vid: u64) -> Result<Arc<PinCell<Vertex>>, BuilderError> {
        let handle = self.vertex_handle(vid)?;
        self.vertices.access(handle).map_err(BuilderError::from)
    }

    /// Exclusive access to vertex `vid`'s record, for the relaxation
    /// engine's visit critical section (`spec.md` §4.3 step 1). Returns
    /// [`pgas::RuntimeError::Busy`] if another visit currently holds the
    /// pin; callers retry rather than block.
    pub fn pin_vertex(&self, vid: u64) -> Result<PinGuard<Vertex>, BuilderError> {
        let handle = self.vertex_handle(vid)?;
        self.vertices.pin(handle).map_err(BuilderError::from)
    }

    /// Resets every vertex's distance to `DIST_INF` between SSSP runs
    /// (`spec.md` §4.5 "reset").
    pub fn reset(&self) {
        self.world.range_call(self.num_vertices, |i| {
            if let Ok(vertex) = self.vertex(i) {
                vertex.get().reset_distance();
            }
        });
    }

    /// Explicitly releases every vertex record. PGAS allocations are not
    /// reclaimed automatically; the owning code frees them, mirroring
    /// how a real deployment releases remote memory (`spec.md` §6.1).
    pub fn free(self) {
        for i in 0..self.num_vertices {
            if let Ok(handle) = self.vertex_handle(i) {
                self.vertices.free(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VertexId;
    use crate::types::{Edge, Weight, DIST_INF};
    use pgas::SimWorld;

    fn edge(s: u64, d: u64, w: u64) -> Edge {
        Edge {
            source: VertexId::new(s),
            dest: VertexId::new(d),
            weight: Weight(w),
        }
    }

    #[test]
    fn builds_outgoing_adjacency_on_a_single_locality() {
        let world = SimWorld::new(1, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 5), edge(0, 2, 3), edge(1, 2, 1)]);
        let list = AdjacencyList::build(&world, &edges).unwrap();

        assert_eq!(list.num_vertices(), 3);
        let v0 = list.vertex(0).unwrap();
        let mut dests: Vec<_> = v0.get().edges().iter().map(|e| e.dest.get()).collect();
        dests.sort_unstable();
        assert_eq!(dests, vec![1, 2]);

        let v2 = list.vertex(2).unwrap();
        assert_eq!(v2.get().edge_count(), 0);
        assert_eq!(v2.get().distance(), DIST_INF);
    }

    #[test]
    fn builds_outgoing_adjacency_across_several_localities() {
        let world = SimWorld::new(3, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 1), edge(2, 0, 1), edge(0, 2, 4)]);
        let list = AdjacencyList::build(&world, &edges).unwrap();

        for v in 0..3 {
            let vertex = list.vertex(v).unwrap();
            let expected = edges.iter().filter(|e| e.source.get() == v).count();
            assert_eq!(vertex.get().edge_count() as usize, expected);
        }
    }

    #[test]
    fn rejects_an_edge_with_an_out_of_range_endpoint() {
        let world = SimWorld::new(1, 1);
        let edges = EdgeList::with_num_vertices(vec![edge(0, 5, 1)], 2);
        let err = AdjacencyList::build(&world, &edges).unwrap_err();
        assert!(matches!(err, BuilderError::VertexOutOfRange { endpoint: 5, num_vertices: 2 }));
    }

    #[test]
    fn reset_restores_every_distance_to_infinity() {
        let world = SimWorld::new(2, 1);
        let edges = EdgeList::new(vec![edge(0, 1, 1)]);
        let list = AdjacencyList::build(&world, &edges).unwrap();
        list.vertex(0).unwrap().get().try_update_distance(0);
        list.vertex(1).unwrap().get().try_update_distance(7);

        list.reset();

        assert_eq!(list.vertex(0).unwrap().get().distance(), DIST_INF);
        assert_eq!(list.vertex(1).unwrap().get().distance(), DIST_INF);
    }

    #[test]
    fn pin_vertex_is_exclusive() {
        let world = SimWorld::new(1, 1);
        let edges = EdgeList::new(vec![edge(0, 1, 1)]);
        let list = AdjacencyList::build(&world, &edges).unwrap();

        let guard = list.pin_vertex(0).unwrap();
        assert!(matches!(list.pin_vertex(0), Err(BuilderError::Runtime(pgas::RuntimeError::Busy))));
        drop(guard);
        assert!(list.pin_vertex(0).is_ok());
    }

    #[test]
    fn an_empty_edge_list_builds_an_empty_adjacency_list() {
        let world = SimWorld::new(2, 1);
        let edges = EdgeList::new(vec![]);
        let list = AdjacencyList::build(&world, &edges).unwrap();
        assert_eq!(list.num_vertices(), 0);
    }
}
