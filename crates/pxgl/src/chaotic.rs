use std::sync::Arc;

use pgas::{LocalityContext, World};
use pxgl_builder::Distance;

use crate::relax::remote_visit;
use crate::state::RunState;

/// Chaotic relaxation (`spec.md` §4.4.1): every relax task is dispatched
/// immediately, with no local queuing; the "no coordination beyond the
/// CAS" baseline strategy.
pub(crate) fn dispatch<W: World>(state: &Arc<RunState<W>>, ctx: &LocalityContext, dest: u64, distance: Distance) {
    ctx.activate(1);
    remote_visit(state, dest, distance);
}
