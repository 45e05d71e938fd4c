//! Distributed adjacency-list construction for the SSSP engine
//! (`spec.md` §4.1).
//!
//! This crate owns the handoff from an external edge-list loader (an
//! [`EdgeList`]) to the final, per-vertex outgoing-adjacency structure
//! the relaxation engine reads: a count/allocate/insert pipeline
//! dispatched across simulated localities through [`pgas::World`] and
//! gated by [`termination::Detector`].

mod adjacency;
mod edge_list;
mod error;
mod index;
pub mod prelude;
mod shared_mut;
mod types;

pub use adjacency::AdjacencyList;
pub use edge_list::EdgeList;
pub use error::BuilderError;
pub use index::VertexId;
pub use types::{AdjacencyEdge, Distance, Edge, Vertex, Weight, DIST_INF};
