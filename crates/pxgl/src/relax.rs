use std::sync::Arc;

use pgas::{AndLco, LocalityContext, World};
use pxgl_builder::{AdjacencyList, Distance, Vertex};

use crate::config::SsspKind;
use crate::state::RunState;
use crate::{chaotic, distributed_control, delta_stepping};

/// The shared visit contract (`spec.md` §4.3): pin the vertex, attempt
/// the CAS, and, only on success, dispatch a relax task per outgoing
/// edge before unpinning. A `Busy` pin is retried rather than treated as
/// failure: this is the resend contract of `spec.md` §6.1 exercised
/// in-process as a cooperative-yield retry loop instead of a resend to
/// the scheduler, since both give the same forward-progress guarantee
/// in a single shared process.
pub fn visit<W: World>(state: &Arc<RunState<W>>, ctx: &LocalityContext, target: u64, distance: Distance) {
    let vertex = loop {
        match state.graph.pin_vertex(target) {
            Ok(guard) => break guard,
            Err(_) => state.world.cooperative_yield(),
        }
    };

    if vertex.try_update_distance(distance) {
        relax_neighbors(state, ctx, &vertex, distance);
    }
    ctx.finish(1);
}

/// Dispatches a relax task for every outgoing edge of a vertex whose
/// distance is already known to equal `distance` (`spec.md` §4.3 step
/// 3). Shared between `visit`'s immediate case and the deferred cases
/// (distributed control's queue drain and delta-stepping's bucket drain),
/// which arrive here having already confirmed staleness some other way.
pub(crate) fn relax_neighbors<W: World>(
    state: &Arc<RunState<W>>,
    ctx: &LocalityContext,
    vertex: &Vertex,
    distance: Distance,
) {
    for edge in vertex.edges() {
        dispatch_relax(state, ctx, edge.dest.get(), distance + edge.weight.0);
    }
}

fn dispatch_relax<W: World>(state: &Arc<RunState<W>>, ctx: &LocalityContext, dest: u64, distance: Distance) {
    match state.kind {
        SsspKind::Chaotic => chaotic::dispatch(state, ctx, dest, distance),
        SsspKind::DistributedControl => distributed_control::push(state, ctx, dest, distance),
        SsspKind::DeltaStepping => delta_stepping::route(state, ctx, dest, distance),
    }
}

/// Makes the real remote call that performs a vertex's visit, shared by
/// the chaotic strategy's immediate dispatch and delta-stepping's
/// immediate-level and drain-phase dispatch. Bookkeeping (`activate`)
/// is the caller's responsibility; see each call site.
pub(crate) fn remote_visit<W: World>(state: &Arc<RunState<W>>, dest: u64, distance: Distance) {
    let target = state.graph.owning_locality(dest);
    let s = Arc::clone(state);
    state.world.call(target, move |ctx| visit(&s, ctx, dest, distance));
}

/// The and-LCO termination variant of visit (`spec.md` §4.5 mode 3):
/// dispatches recursively through blocking `call_sync` calls joined by a
/// local and-LCO rather than fire-and-forget `call` plus a termination
/// detector. `SsspConfig::validate` only allows this with the chaotic
/// strategy: distributed control requires count termination and
/// delta-stepping forbids and-LCO termination outright, so there is no
/// queue or bucket state to thread through here.
pub(crate) fn visit_sync<W: World>(world: &Arc<W>, graph: &Arc<AdjacencyList<W>>, target: u64, distance: Distance) {
    let vertex = loop {
        match graph.pin_vertex(target) {
            Ok(guard) => break guard,
            Err(_) => world.cooperative_yield(),
        }
    };

    let edges: Vec<_> = if vertex.try_update_distance(distance) { vertex.edges().to_vec() } else { Vec::new() };
    drop(vertex);

    if edges.is_empty() {
        return;
    }

    let and_lco = AndLco::new(edges.len() as u64);
    rayon::scope(|scope| {
        for edge in &edges {
            let and_lco = &and_lco;
            let world = Arc::clone(world);
            let graph = Arc::clone(graph);
            let dest = edge.dest.get();
            let next_distance = distance + edge.weight.0;
            scope.spawn(move |_| {
                let target = graph.owning_locality(dest);
                world.call_sync(target, |_ctx| visit_sync(&world, &graph, dest, next_distance));
                and_lco.set();
            });
        }
    });
    and_lco.wait();
}
