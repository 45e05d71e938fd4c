pub use crate::adjacency::AdjacencyList;
pub use crate::edge_list::EdgeList;
pub use crate::error::BuilderError;
pub use crate::index::VertexId;
pub use crate::types::{AdjacencyEdge, Distance, Edge, Vertex, Weight, DIST_INF};
