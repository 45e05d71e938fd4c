use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pgas::{LocalityId, World};
use pxgl_builder::{AdjacencyList, Distance};

use crate::buckets::BucketStore;
use crate::config::{SsspConfig, SsspKind};
use crate::pqueue::PriorityQueue;

/// Everything a dispatched relax task needs, bound once at `sssp`'s
/// entry and shared by `Arc` across every task the run spawns
/// (`spec.md` §4.4.4: "strategy selection binds a single dispatch
/// target at init; it does not change during the run").
pub struct RunState<W: World> {
    pub world: Arc<W>,
    pub graph: Arc<AdjacencyList<W>>,
    pub kind: SsspKind,
    pub delta: Distance,
    pub drain_freq: u32,
    queues: Vec<Vec<PriorityQueue>>,
    buckets: Vec<BucketStore>,
    current_level: AtomicU64,
}

impl<W: World> RunState<W> {
    pub fn new(world: Arc<W>, graph: Arc<AdjacencyList<W>>, config: &SsspConfig) -> Self {
        let localities = world.locality_count();
        let num_pq = config.num_pq.unwrap_or(SsspConfig::DEFAULT_NUM_PQ).max(1);
        let threads_per_locality = world.threads_per_locality();

        let queues = (0..localities)
            .map(|_| (0..num_pq).map(|_| PriorityQueue::new()).collect())
            .collect();
        let buckets = (0..localities).map(|_| BucketStore::new(threads_per_locality)).collect();

        Self {
            world,
            graph,
            kind: config.kind,
            delta: config.delta.unwrap_or(1).max(1),
            drain_freq: config.drain_freq.unwrap_or(SsspConfig::DEFAULT_DRAIN_FREQ).max(1),
            queues,
            buckets,
            current_level: AtomicU64::new(0),
        }
    }

    pub fn queues_for(&self, locality: LocalityId) -> &[PriorityQueue] {
        &self.queues[locality.get() as usize]
    }

    pub fn buckets_for(&self, locality: LocalityId) -> &BucketStore {
        &self.buckets[locality.get() as usize]
    }

    pub fn level_of(&self, distance: Distance) -> u64 {
        distance / self.delta
    }

    pub fn current_level(&self) -> u64 {
        self.current_level.load(Ordering::Acquire)
    }

    pub fn set_current_level(&self, level: u64) {
        self.current_level.store(level, Ordering::Release);
    }
}
