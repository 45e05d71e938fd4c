use std::cmp::Reverse;
use std::collections::BinaryHeap;

use parking_lot::Mutex;
use pxgl_builder::Distance;

/// The priority-queue shim distributed control drains in distance order
/// (`spec.md` §4.6). Grounded on
/// `original_source/apps/libPXGL/src/pqueue_wrapper.c`'s array-backed
/// binary heap behind a single mutex; `std::collections::BinaryHeap` is
/// already array-backed, so it is reused directly rather than
/// hand-rolling sift-up/down.
pub struct PriorityQueue {
    heap: Mutex<BinaryHeap<Reverse<(Distance, u64)>>>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self { heap: Mutex::new(BinaryHeap::new()) }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: Mutex::new(BinaryHeap::with_capacity(capacity)) }
    }

    /// Pushes `(vertex, distance)`. Returns `true` if this push
    /// transitioned the queue from empty to non-empty; the drain task
    /// is spawned only on that transition (`spec.md` §4.4.2).
    pub fn push(&self, vertex: u64, distance: Distance) -> bool {
        let mut heap = self.heap.lock();
        let was_empty = heap.is_empty();
        heap.push(Reverse((distance, vertex)));
        was_empty
    }

    pub fn pop(&self) -> Option<(u64, Distance)> {
        let mut heap = self.heap.lock();
        heap.pop().map(|Reverse((distance, vertex))| (vertex, distance))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_distance_order() {
        let queue = PriorityQueue::new();
        queue.push(3, 30);
        queue.push(1, 10);
        queue.push(2, 20);

        assert_eq!(queue.pop(), Some((1, 10)));
        assert_eq!(queue.pop(), Some((2, 20)));
        assert_eq!(queue.pop(), Some((3, 30)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn push_reports_the_empty_to_nonempty_transition() {
        let queue = PriorityQueue::new();
        assert!(queue.push(1, 5));
        assert!(!queue.push(2, 6));
        queue.pop();
        assert!(queue.push(3, 7));
    }

    #[test]
    fn ties_are_broken_deterministically_but_both_entries_survive() {
        let queue = PriorityQueue::new();
        queue.push(1, 5);
        queue.push(2, 5);
        let mut popped = vec![queue.pop().unwrap(), queue.pop().unwrap()];
        popped.sort_unstable();
        assert_eq!(popped, vec![(1, 5), (2, 5)]);
    }
}
