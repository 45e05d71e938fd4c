use thiserror::Error;

/// Errors reported by the PGAS runtime surface itself, as opposed to
/// errors raised by the algorithm layered on top of it.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A `pin` attempt found the target slot already pinned. Per the
    /// runtime contract, the caller should resend the originating action
    /// to the same target; every action in this codebase is idempotent
    /// under resend.
    #[error("target is busy, resend to the same destination")]
    Busy,

    /// A dispatch could not be enqueued because the per-peer retry
    /// ledger is at capacity.
    #[error("ledger exhausted, request stashed for retry")]
    LedgerExhausted,

    /// A handle was dereferenced after its arena entry was freed, or an
    /// allocation request referenced an unknown locality.
    #[error("invalid global handle")]
    InvalidHandle,

    /// Any other host-runtime failure: LCO misuse, allocation failure,
    /// or (in a real deployment) a transport error.
    #[error("runtime failure: {0}")]
    RuntimeFailure(String),
}
