use std::sync::Arc;

use pgas::{LocalityContext, LocalityId, World};
use pxgl_builder::Distance;
use termination::Detector;

use crate::buckets::MAX_LEVEL;
use crate::relax::remote_visit;
use crate::state::RunState;

/// Routing (`spec.md` §4.4.3): when the visit path would dispatch a
/// relax task for `distance`, defer into the executing thread's bucket
/// if its level is beyond the phase currently running; otherwise behave
/// exactly like chaotic. A deferred entry is neither activated nor
/// finished here; `run_phase_loop`'s announce step activates it when
/// it is counted, and the eventual real dispatch's `visit` call finishes
/// it, exactly like every other relax task.
pub(crate) fn route<W: World>(state: &Arc<RunState<W>>, ctx: &LocalityContext, dest: u64, distance: Distance) {
    let level = state.level_of(distance);
    if level > state.current_level() {
        let thread = state.world.thread_id();
        state.buckets_for(ctx.id()).insert(thread, level, dest, distance);
        return;
    }
    ctx.activate(1);
    remote_visit(state, dest, distance);
}

/// The driver's phase loop (`spec.md` §4.4.3): announce, drain, detect
/// termination, advance to the next non-empty level, repeat until every
/// locality's buckets are exhausted beyond the current level.
pub(crate) fn run_phase_loop<W: World>(state: &Arc<RunState<W>>) {
    loop {
        let level = state.current_level();

        world_broadcast_announce(state, level);
        world_broadcast_drain(state, level);
        Detector::detect(&state.world);

        let next = (0..state.world.locality_count())
            .map(|l| state.buckets_for(LocalityId::new(l)).next_nonempty_level(level))
            .min()
            .unwrap_or(MAX_LEVEL);

        if next == MAX_LEVEL {
            return;
        }
        state.set_current_level(next);
    }
}

/// Phase step 1: counts every thread's bucket at `level`, locality by
/// locality, and credits the count to that locality's `active_count`
/// before any of those entries are actually dispatched.
fn world_broadcast_announce<W: World>(state: &Arc<RunState<W>>, level: u64) {
    state.world.broadcast(|ctx| {
        let count = state.buckets_for(ctx.id()).count_at(level);
        if count > 0 {
            ctx.activate(count);
        }
    });
}

/// Phase step 2: dispatches the deferred relax task for every entry in
/// every locality's bucket at `level`, exactly as chaotic would have
/// dispatched it immediately.
fn world_broadcast_drain<W: World>(state: &Arc<RunState<W>>, level: u64) {
    state.world.broadcast(|ctx| {
        for (dest, distance) in state.buckets_for(ctx.id()).drain_at(level) {
            remote_visit(state, dest, distance);
        }
    });
}
