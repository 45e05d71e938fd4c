use std::cell::Cell;
use std::sync::Arc;

use crate::context::LocalityContext;
use crate::ids::LocalityId;

thread_local! {
    static CURRENT_LOCALITY: Cell<Option<u32>> = const { Cell::new(None) };
}

fn with_locality<R>(locality: LocalityId, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT_LOCALITY.with(|c| c.replace(Some(locality.get())));
    let result = f();
    CURRENT_LOCALITY.with(|c| c.set(previous));
    result
}

/// The PGAS runtime surface the core consumes, per `spec.md` §6.1.
/// `SimWorld` is the one production implementation: a simulated
/// multi-locality process sharing a single address space and the
/// global `rayon` thread pool. The dispatch methods (`call`,
/// `call_sync`, `range_call`, `broadcast`) are provided here as default
/// methods on `Arc<Self>` so a genuinely distributed implementor could
/// replace `SimWorld` without the algorithm layers (`termination`,
/// `pxgl_builder`, `pxgl`) changing.
pub trait World: Send + Sync + Sized + 'static {
    fn locality_count(&self) -> u32;

    fn context(&self, locality: LocalityId) -> &LocalityContext;

    /// This worker's current locality, valid only while executing a
    /// closure dispatched through `call`, `call_sync`, `range_call`, or
    /// `broadcast`.
    fn current_locality(&self) -> LocalityId {
        LocalityId::new(
            CURRENT_LOCALITY
                .with(|c| c.get())
                .expect("current_locality() called outside of a dispatched action"),
        )
    }

    fn thread_id(&self) -> u32 {
        rayon::current_thread_index().unwrap_or(0) as u32
    }

    fn threads_per_locality(&self) -> u32;

    fn cooperative_yield(&self) {
        std::thread::yield_now();
    }

    /// Fire-and-forget dispatch: runs `f` against `target`'s context on
    /// a pool worker and returns immediately. `f` is responsible for its
    /// own bookkeeping (activate/finish); the PGAS layer has no idea
    /// what an action means.
    fn call(self: &Arc<Self>, target: LocalityId, f: impl FnOnce(&LocalityContext) + Send + 'static) {
        let this = Arc::clone(self);
        rayon::spawn(move || {
            with_locality(target, || f(this.context(target)));
        });
    }

    /// Blocking RPC: runs `f` against `target`'s context and returns
    /// its result once `f` completes.
    fn call_sync<R: Send>(self: &Arc<Self>, target: LocalityId, f: impl FnOnce(&LocalityContext) -> R + Send) -> R {
        with_locality(target, || f(self.context(target)))
    }

    /// Fan-out: invokes `f(i)` once per `i` in `0..n`, in parallel. `f`
    /// calls back into `call`/`call_sync` if it needs to target a
    /// locality derived from `i`.
    fn range_call(self: &Arc<Self>, n: u64, f: impl Fn(u64) + Sync) {
        use rayon::prelude::*;
        (0..n).into_par_iter().for_each(|i| f(i));
    }

    /// Invokes `f` against every locality's context, in parallel, and
    /// blocks until all have completed.
    fn broadcast(self: &Arc<Self>, f: impl Fn(&LocalityContext) + Sync) {
        use rayon::prelude::*;
        (0..self.locality_count())
            .into_par_iter()
            .map(LocalityId::new)
            .for_each(|locality| with_locality(locality, || f(self.context(locality))));
    }
}

/// The simulated implementor of [`World`].
pub struct SimWorld {
    contexts: Vec<LocalityContext>,
    threads_per_locality: u32,
}

impl SimWorld {
    pub fn new(localities: u32, threads_per_locality: u32) -> Arc<Self> {
        assert!(localities > 0, "a PGAS job needs at least one locality");
        log::info!("simulating {localities} localities, {threads_per_locality} threads per locality");
        Arc::new(Self {
            contexts: (0..localities).map(|i| LocalityContext::new(LocalityId::new(i))).collect(),
            threads_per_locality,
        })
    }
}

impl World for SimWorld {
    fn locality_count(&self) -> u32 {
        self.contexts.len() as u32
    }

    fn context(&self, locality: LocalityId) -> &LocalityContext {
        &self.contexts[locality.get() as usize]
    }

    fn threads_per_locality(&self) -> u32 {
        self.threads_per_locality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Future;
    use std::sync::Arc as StdArc;

    #[test]
    fn call_sync_observes_the_target_locality() {
        let world = SimWorld::new(4, 2);
        let observed = world.call_sync(LocalityId::new(2), |_ctx| world.current_locality());
        assert_eq!(observed.get(), 2);
    }

    #[test]
    fn call_dispatches_to_a_worker_and_completes() {
        let world = SimWorld::new(3, 1);
        let future = StdArc::new(Future::new());
        let result_future = StdArc::clone(&future);
        world.call(LocalityId::new(1), move |ctx| {
            ctx.activate(1);
            result_future.set(ctx.id().get());
        });
        assert_eq!(future.get(), 1);
    }

    #[test]
    fn broadcast_reaches_every_locality() {
        let world = SimWorld::new(5, 1);
        world.broadcast(|ctx| ctx.activate(1));
        for i in 0..5 {
            assert_eq!(world.context(LocalityId::new(i)).snapshot(), (1, 0));
        }
    }

    #[test]
    fn range_call_runs_once_per_index() {
        let world = SimWorld::new(1, 1);
        let counter = StdArc::new(std::sync::atomic::AtomicU64::new(0));
        let c = StdArc::clone(&counter);
        world.range_call(100, move |_i| {
            c.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        });
        assert_eq!(counter.load(std::sync::atomic::Ordering::Relaxed), 100);
    }
}
