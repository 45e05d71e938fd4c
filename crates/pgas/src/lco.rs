//! Local Control Objects: the synchronization primitives the relaxation
//! engine and the termination detector wait on. Every LCO here is
//! addressable from any simulated locality since all of them live in
//! this one process; `set`/`get`/`wait`/`delete` match `spec.md` §6.1.

use parking_lot::{Condvar, Mutex};

/// A single-shot future: `set` may be called at most once, `wait`/`get`
/// block until it has been.
pub struct Future<T> {
    state: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T: Clone> Future<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    pub fn set(&self, value: T) {
        let mut state = self.state.lock();
        debug_assert!(state.is_none(), "future set more than once");
        *state = Some(value);
        self.ready.notify_all();
    }

    pub fn wait(&self) {
        let mut state = self.state.lock();
        while state.is_none() {
            self.ready.wait(&mut state);
        }
    }

    pub fn get(&self) -> T {
        let mut state = self.state.lock();
        while state.is_none() {
            self.ready.wait(&mut state);
        }
        state.clone().expect("checked above")
    }
}

impl<T: Clone> Default for Future<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An N-input AND barrier: completes once `set` has been called `n`
/// times, regardless of order.
pub struct AndLco {
    remaining: Mutex<u64>,
    done: Condvar,
}

impl AndLco {
    pub fn new(n: u64) -> Self {
        Self {
            remaining: Mutex::new(n),
            done: Condvar::new(),
        }
    }

    /// Contributes one completion. Idempotency of the dispatch path
    /// (`spec.md` §6.1 resource fault note) means a single logical
    /// completion must never call this twice; that invariant is the
    /// caller's responsibility, same as the source runtime.
    pub fn set(&self) {
        let mut remaining = self.remaining.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.done.notify_all();
        }
    }

    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining != 0 {
            self.done.wait(&mut remaining);
        }
    }
}

/// An N-input reduction over a commutative, associative `op`, starting
/// from `identity`.
pub struct ReduceLco<T> {
    identity: T,
    op: fn(T, T) -> T,
    state: Mutex<ReduceState<T>>,
    done: Condvar,
}

struct ReduceState<T> {
    remaining: u32,
    accumulator: T,
}

impl<T: Clone + Send> ReduceLco<T> {
    pub fn new(n: u32, identity: T, op: fn(T, T) -> T) -> Self {
        Self {
            identity: identity.clone(),
            op,
            state: Mutex::new(ReduceState {
                remaining: n,
                accumulator: identity,
            }),
            done: Condvar::new(),
        }
    }

    pub fn contribute(&self, value: T) {
        let mut state = self.state.lock();
        state.accumulator = (self.op)(state.accumulator.clone(), value);
        state.remaining = state.remaining.saturating_sub(1);
        if state.remaining == 0 {
            self.done.notify_all();
        }
    }

    pub fn get(&self) -> T {
        let mut state = self.state.lock();
        while state.remaining != 0 {
            self.done.wait(&mut state);
        }
        state.accumulator.clone()
    }

    /// Resets the reduction for another round with `n` contributors,
    /// as the termination detector's repeated all-reduce loop requires.
    pub fn reset(&self, n: u32) {
        let mut state = self.state.lock();
        state.remaining = n;
        state.accumulator = self.identity.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn and_lco_waits_for_every_contributor() {
        let lco = Arc::new(AndLco::new(4));
        let mut handles = vec![];
        for _ in 0..4 {
            let lco = Arc::clone(&lco);
            handles.push(thread::spawn(move || lco.set()));
        }
        lco.wait();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn reduce_lco_sums_contributions() {
        let lco = ReduceLco::new(3, 0_u64, |a, b| a + b);
        lco.contribute(1);
        lco.contribute(2);
        lco.contribute(3);
        assert_eq!(lco.get(), 6);
    }

    #[test]
    fn reduce_lco_reset_starts_a_fresh_round() {
        let lco = ReduceLco::new(2, 0_u64, |a, b| a + b);
        lco.contribute(5);
        lco.contribute(5);
        assert_eq!(lco.get(), 10);
        lco.reset(2);
        lco.contribute(1);
        lco.contribute(1);
        assert_eq!(lco.get(), 2);
    }

    #[test]
    fn future_get_blocks_until_set() {
        let future = Arc::new(Future::new());
        let producer = Arc::clone(&future);
        let handle = thread::spawn(move || producer.set(7_u32));
        assert_eq!(future.get(), 7);
        handle.join().unwrap();
    }
}
