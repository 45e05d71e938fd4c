use std::sync::Arc;
use std::time::Instant;

use log::info;
use pgas::SimWorld;
use pxgl::{SsspConfig, SsspKind};
use pxgl_builder::{AdjacencyList, VertexId};

mod dimacs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli::AppArgs {
        path,
        source,
        localities,
        threads_per_locality,
        kind,
        termination,
        delta,
        num_pq,
        drain_freq,
        print_distances,
    } = cli::create()?;

    info!("reading DIMACS graph from: {path:?}");
    let edges = dimacs::read_edge_list(&path)?;

    let world = SimWorld::new(localities, threads_per_locality);
    let graph = Arc::new(AdjacencyList::build(&world, &edges)?);

    let mut config = match kind {
        SsspKind::Chaotic => SsspConfig::chaotic(termination),
        SsspKind::DistributedControl => {
            SsspConfig::distributed_control(num_pq.unwrap_or(SsspConfig::DEFAULT_NUM_PQ), drain_freq.unwrap_or(SsspConfig::DEFAULT_DRAIN_FREQ))
        }
        SsspKind::DeltaStepping => SsspConfig::delta_stepping(delta.unwrap_or(1)),
    };
    config.termination = termination;

    let start = Instant::now();
    pxgl::sssp(&world, &graph, VertexId::new(source), config)?;
    info!("sssp completed in {:?}", start.elapsed());

    if print_distances {
        for v in 0..graph.num_vertices() {
            println!("{v} {}", graph.vertex(v).unwrap().get().distance());
        }
    }

    Ok(())
}

mod cli {
    use std::{convert::Infallible, ffi::OsStr, path::PathBuf};

    use pico_args::Arguments;
    use pxgl::{SsspKind, TerminationMode};

    #[derive(Debug)]
    pub(crate) struct AppArgs {
        pub(crate) path: PathBuf,
        pub(crate) source: u64,
        pub(crate) localities: u32,
        pub(crate) threads_per_locality: u32,
        pub(crate) kind: SsspKind,
        pub(crate) termination: TerminationMode,
        pub(crate) delta: Option<u64>,
        pub(crate) num_pq: Option<u32>,
        pub(crate) drain_freq: Option<u32>,
        pub(crate) print_distances: bool,
    }

    pub(crate) fn create() -> Result<AppArgs, Box<dyn std::error::Error>> {
        let mut pargs = Arguments::from_env();

        fn as_path_buf(arg: &OsStr) -> Result<PathBuf, Infallible> {
            Ok(arg.into())
        }

        let args = AppArgs {
            path: pargs.value_from_os_str(["-p", "--path"], as_path_buf)?,
            source: pargs.opt_value_from_str(["-s", "--source"])?.unwrap_or(0),
            localities: pargs.opt_value_from_str("--localities")?.unwrap_or(4),
            threads_per_locality: pargs.opt_value_from_str("--threads-per-locality")?.unwrap_or(4),
            kind: parse_kind(pargs.opt_value_from_str::<_, String>("--kind")?)?,
            termination: parse_termination(pargs.opt_value_from_str::<_, String>("--termination")?)?,
            delta: pargs.opt_value_from_str("--delta")?,
            num_pq: pargs.opt_value_from_str("--num-pq")?,
            drain_freq: pargs.opt_value_from_str("--drain-freq")?,
            print_distances: pargs.contains("--distances"),
        };

        Ok(args)
    }

    fn parse_kind(value: Option<String>) -> Result<SsspKind, Box<dyn std::error::Error>> {
        Ok(match value.as_deref() {
            None | Some("chaotic") => SsspKind::Chaotic,
            Some("distributed-control") => SsspKind::DistributedControl,
            Some("delta-stepping") => SsspKind::DeltaStepping,
            Some(other) => return Err(format!("unknown --kind: {other}").into()),
        })
    }

    fn parse_termination(value: Option<String>) -> Result<TerminationMode, Box<dyn std::error::Error>> {
        Ok(match value.as_deref() {
            None | Some("count") => TerminationMode::Count,
            Some("and-lco") => TerminationMode::AndLco,
            Some("process") => TerminationMode::Process,
            Some(other) => return Err(format!("unknown --termination: {other}").into()),
        })
    }
}
