use std::sync::Arc;
use std::time::Instant;

use pgas::{AndLco, World};
use pxgl_builder::{AdjacencyList, VertexId};
use termination::Detector;

use crate::config::{SsspConfig, TerminationMode};
use crate::delta_stepping;
use crate::error::PxglError;
use crate::relax::{visit, visit_sync};
use crate::state::RunState;

/// Runs a single-source shortest paths computation to quiescence
/// (`spec.md` §4.5, §6.3). On return every vertex reachable from
/// `source` holds its true distance; unreachable vertices keep
/// `DIST_INF`.
pub fn sssp<W: World>(
    world: &Arc<W>,
    graph: &Arc<AdjacencyList<W>>,
    source: VertexId,
    config: SsspConfig,
) -> Result<(), PxglError> {
    config.validate()?;
    log::info!(
        "starting sssp: source={source}, kind={:?}, termination={:?}",
        config.kind, config.termination
    );
    let start = Instant::now();
    let source_locality = graph.owning_locality(source.get());

    match config.termination {
        TerminationMode::Count => {
            let state = Arc::new(RunState::new(Arc::clone(world), Arc::clone(graph), &config));
            world.broadcast(|ctx| ctx.reset_counters());
            world.context(source_locality).activate(1);
            let s = Arc::clone(&state);
            world.call(source_locality, move |ctx| visit(&s, ctx, source.get(), 0));

            if matches!(config.kind, crate::config::SsspKind::DeltaStepping) {
                Detector::detect(world);
                delta_stepping::run_phase_loop(&state);
            } else {
                Detector::detect(world);
            }
        }
        TerminationMode::AndLco => {
            let and_lco = Arc::new(AndLco::new(1));
            let completion = Arc::clone(&and_lco);
            let world_handle = Arc::clone(world);
            let graph_handle = Arc::clone(graph);
            world.call_sync(source_locality, move |_ctx| {
                visit_sync(&world_handle, &graph_handle, source.get(), 0);
                completion.set();
            });
            and_lco.wait();
        }
        TerminationMode::Process => {
            log::warn!(
                "process termination has no distinct primitive in this simulation; falling back to and-LCO semantics"
            );
            visit_sync(world, graph, source.get(), 0);
        }
    }

    log::info!("sssp reached quiescence in {:?}", start.elapsed());
    Ok(())
}

/// Resets every vertex's distance to `DIST_INF` between SSSP runs
/// (`spec.md` §4.5 "Reset"), so a second `sssp` call with a different
/// source starts from a clean slate.
pub fn reset<W: World>(graph: &AdjacencyList<W>) {
    graph.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgas::SimWorld;
    use pxgl_builder::{Edge, EdgeList, Weight, DIST_INF};

    fn edge(s: u64, d: u64, w: u64) -> Edge {
        Edge { source: VertexId::new(s), dest: VertexId::new(d), weight: Weight(w) }
    }

    fn distances<W: World>(graph: &AdjacencyList<W>) -> Vec<u64> {
        (0..graph.num_vertices()).map(|v| graph.vertex(v).unwrap().get().distance()).collect()
    }

    #[test]
    fn line_graph_chaotic_count() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 2), edge(2, 3, 4)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 1, 3, 7]);
    }

    #[test]
    fn triangle_with_a_shortcut_chaotic_count() {
        let world = SimWorld::new(3, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 5), edge(1, 2, 1), edge(0, 2, 10)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 5, 6]);
    }

    #[test]
    fn disconnected_vertices_stay_unreachable() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(2, 3, 1)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 1, DIST_INF, DIST_INF]);
    }

    #[test]
    fn two_paths_converge_to_the_shorter_one_regardless_of_relax_order() {
        let world = SimWorld::new(4, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 3), edge(0, 2, 1), edge(1, 3, 1), edge(2, 3, 5)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 3, 1, 4]);
    }

    #[test]
    fn reset_then_rerun_from_a_new_source() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 2), edge(2, 3, 4)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();
        assert_eq!(distances(&*graph), vec![0, 1, 3, 7]);

        reset(&graph);
        sssp(&world, &graph, VertexId::new(3), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![DIST_INF, DIST_INF, DIST_INF, 0]);
    }

    #[test]
    fn rerunning_without_a_reset_is_idempotent() {
        let world = SimWorld::new(1, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 2)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();
        let first = distances(&*graph);
        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();
        let second = distances(&*graph);

        assert_eq!(first, second);
    }

    #[test]
    fn single_vertex_graph_completes_trivially() {
        let world = SimWorld::new(1, 1);
        let edges = EdgeList::with_num_vertices(vec![], 1);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::Count)).unwrap();

        assert_eq!(distances(&*graph), vec![0]);
    }

    #[test]
    fn distributed_control_matches_chaotic_on_the_same_graph() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 2), edge(2, 3, 4)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::distributed_control(3, 16)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 1, 3, 7]);
    }

    #[test]
    fn delta_stepping_matches_chaotic_on_the_same_graph() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 1), edge(1, 2, 2), edge(2, 3, 4)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::delta_stepping(3)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 1, 3, 7]);
    }

    #[test]
    fn and_lco_termination_matches_count_termination() {
        let world = SimWorld::new(2, 2);
        let edges = EdgeList::new(vec![edge(0, 1, 5), edge(1, 2, 1), edge(0, 2, 10)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        sssp(&world, &graph, VertexId::new(0), SsspConfig::chaotic(TerminationMode::AndLco)).unwrap();

        assert_eq!(distances(&*graph), vec![0, 5, 6]);
    }

    #[test]
    fn all_three_strategies_agree_on_a_random_dag() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let num_vertices = 40_u64;
        let edges: Vec<_> = (0..num_vertices)
            .flat_map(|src| {
                let out_degree = rng.gen_range(0..4);
                (0..out_degree).filter_map(move |_| {
                    let dest = rng.gen_range(0..num_vertices);
                    (dest != src).then(|| edge(src, dest, rng.gen_range(1..20)))
                })
            })
            .collect();

        let configs = [
            SsspConfig::chaotic(TerminationMode::Count),
            SsspConfig::distributed_control(3, 8),
            SsspConfig::delta_stepping(5),
        ];

        let mut results = Vec::new();
        for config in configs {
            let world = SimWorld::new(3, 2);
            let edges = EdgeList::with_num_vertices(edges.clone(), num_vertices);
            let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());
            sssp(&world, &graph, VertexId::new(0), config).unwrap();
            results.push(distances(&*graph));
        }

        assert_eq!(results[0], results[1]);
        assert_eq!(results[0], results[2]);
    }

    #[test]
    fn invalid_configurations_are_rejected_before_any_work_runs() {
        let world = SimWorld::new(1, 1);
        let edges = EdgeList::new(vec![edge(0, 1, 1)]);
        let graph = Arc::new(AdjacencyList::build(&world, &edges).unwrap());

        let mut config = SsspConfig::delta_stepping(1);
        config.delta = None;
        let err = sssp(&world, &graph, VertexId::new(0), config).unwrap_err();
        assert!(matches!(err, PxglError::InvalidConfiguration(_)));
    }
}
