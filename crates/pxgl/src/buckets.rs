use parking_lot::Mutex;
use pxgl_builder::Distance;

/// Sentinel level meaning "no non-empty bucket remains", the signal
/// that ends delta-stepping's phase loop (`spec.md` §4.4.3 step 4).
pub const MAX_LEVEL: u64 = u64::MAX;

/// One locality's delta-stepping bucket store: `threads` per-thread bins,
/// each indexed by level (`distance / delta`). Grounded on the
/// `ThreadLocalBins` pattern for a shared-memory delta-stepping
/// implementation, generalized from a single process's
/// `rayon::par_iter_mut` bins to a store one instance of which is
/// dispatched to per simulated locality.
///
/// The source runtime partitions each locality's worker threads into a
/// disjoint `threads_per_locality`-sized pool; this simulation shares one
/// `rayon` pool across every locality, so bucket slots are addressed by
/// `thread_id % threads_per_locality` rather than a truly disjoint
/// thread range. This still gives every worker its own bin (no sharing
/// during a phase, matching `spec.md` §5), it just maps more than one
/// physical worker onto the same slot when the pool is smaller than
/// `threads_per_locality * locality_count`.
pub struct BucketStore {
    threads: Vec<Mutex<Vec<Vec<(u64, Distance)>>>>,
}

impl BucketStore {
    pub fn new(threads_per_locality: u32) -> Self {
        let threads = (0..threads_per_locality.max(1)).map(|_| Mutex::new(Vec::new())).collect();
        Self { threads }
    }

    fn slot(&self, thread_id: u32) -> usize {
        thread_id as usize % self.threads.len()
    }

    /// Inserts `(vertex, distance)` into `thread_id`'s bin at `level`.
    pub fn insert(&self, thread_id: u32, level: u64, vertex: u64, distance: Distance) {
        let mut bins = self.threads[self.slot(thread_id)].lock();
        let level = level as usize;
        if level >= bins.len() {
            bins.resize_with(level + 1, Vec::new);
        }
        bins[level].push((vertex, distance));
    }

    /// The number of entries across every thread's bin at `level`.
    pub fn count_at(&self, level: u64) -> u64 {
        self.threads
            .iter()
            .map(|t| t.lock().get(level as usize).map_or(0, Vec::len) as u64)
            .sum()
    }

    /// Removes and returns every entry across every thread's bin at
    /// `level`.
    pub fn drain_at(&self, level: u64) -> Vec<(u64, Distance)> {
        let mut out = Vec::new();
        for t in &self.threads {
            let mut bins = t.lock();
            if let Some(bin) = bins.get_mut(level as usize) {
                out.append(bin);
            }
        }
        out
    }

    /// The smallest level strictly greater than `after` holding at
    /// least one entry, or [`MAX_LEVEL`] if none remain.
    pub fn next_nonempty_level(&self, after: u64) -> u64 {
        let mut min_level = MAX_LEVEL;
        for t in &self.threads {
            let bins = t.lock();
            for (level, bin) in bins.iter().enumerate() {
                let level = level as u64;
                if level > after && !bin.is_empty() && level < min_level {
                    min_level = level;
                }
            }
        }
        min_level
    }
}
