use crate::index::VertexId;
use crate::types::{Edge, Weight};

/// The handoff contract from an external loader (`spec.md` §4.1 "Input
/// contract", §6.2): an in-memory collection of directed, weighted arcs
/// and the vertex count they span. The adjacency-list constructor owns
/// everything from this point forward; nothing downstream ever touches
/// this type again once `AdjacencyList::build` returns.
///
/// Grounded on the `EdgeList` input type from a chunked-mmap edge-list
/// reader, simplified to a plain owned buffer since this crate's loader
/// (the `cli` DIMACS reader) always parses the whole file before
/// handing it off, rather than streaming directly into a distributed
/// array.
pub struct EdgeList {
    edges: Vec<Edge>,
    num_vertices: u64,
}

impl EdgeList {
    /// Builds an `EdgeList`, inferring `num_vertices` from the highest
    /// vertex id that appears in `edges`.
    pub fn new(edges: Vec<Edge>) -> Self {
        let max_id = edges
            .iter()
            .flat_map(|e| [e.source.get(), e.dest.get()])
            .max();
        let num_vertices = max_id.map_or(0, |m| m + 1);
        Self { edges, num_vertices }
    }

    /// Builds an `EdgeList` with an explicit vertex count, for inputs
    /// (like DIMACS headers) that declare `N_vertices` up front and may
    /// include vertices with no incident edges.
    pub fn with_num_vertices(edges: Vec<Edge>, num_vertices: u64) -> Self {
        debug_assert!(
            edges
                .iter()
                .all(|e| e.source.get() < num_vertices && e.dest.get() < num_vertices),
            "edge references a vertex beyond the declared count"
        );
        Self { edges, num_vertices }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn num_vertices(&self) -> u64 {
        self.num_vertices
    }

    pub fn get(&self, i: usize) -> Edge {
        self.edges[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }
}
