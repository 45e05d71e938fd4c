use thiserror::Error;

/// Errors the adjacency-list constructor can report (`spec.md` §7).
#[derive(Error, Debug)]
pub enum BuilderError {
    /// An edge endpoint is `>= num_vertices`; the input contract requires
    /// every endpoint to be a valid vertex id (`spec.md` §3.4 "Malformed
    /// input").
    #[error("edge endpoint {endpoint} is out of range for {num_vertices} vertices")]
    VertexOutOfRange { endpoint: u64, num_vertices: u64 },

    /// Propagated from a PGAS operation that exhausted its retry budget
    /// rather than resolving a transient `Busy`.
    #[error(transparent)]
    Runtime(#[from] pgas::RuntimeError),
}
