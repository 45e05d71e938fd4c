use thiserror::Error;

/// Errors the SSSP driver can report (`spec.md` §7).
#[derive(Error, Debug)]
pub enum PxglError {
    /// A requested combination of strategy, termination mode, and tuning
    /// parameters cannot be satisfied (`spec.md` §9: distributed control
    /// requires count termination; delta-stepping requires `delta` and
    /// forbids and-LCO termination).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Builder(#[from] pxgl_builder::BuilderError),

    #[error(transparent)]
    Runtime(#[from] pgas::RuntimeError),
}
