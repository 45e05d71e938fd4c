//! A distributed, asynchronous single-source shortest paths engine over
//! a simulated partitioned global address space.
//!
//! [`sssp`] runs three relaxation strategies (chaotic, distributed
//! control, delta-stepping) behind one shared visit contract
//! (`spec.md` §4.3), dispatched through [`pgas::World`] against a
//! [`pxgl_builder::AdjacencyList`] and gated by one of three termination
//! modes (`spec.md` §4.5).

mod buckets;
mod chaotic;
mod config;
mod delta_stepping;
mod distributed_control;
mod driver;
mod error;
mod pqueue;
pub mod prelude;
mod relax;
mod state;

pub use config::{SsspConfig, SsspKind, TerminationMode};
pub use driver::{reset, sssp};
pub use error::PxglError;
