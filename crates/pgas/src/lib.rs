//! A simulated partitioned global address space (PGAS) runtime surface.
//!
//! This crate is the external collaborator described in `spec.md` §6.1:
//! global addressing (`GlobalHandle`), remote action dispatch
//! (`World::call`/`call_sync`/`range_call`/`broadcast`), and LCO
//! synchronization primitives (`Future`, `AndLco`, `ReduceLco`). It owns
//! no graph or SSSP semantics; those live in `termination`,
//! `pxgl_builder`, and `pxgl`.
//!
//! Every locality in this simulation runs in the same OS process,
//! sharing one `rayon` thread pool; `pin`/`unpin` still simulate genuine
//! resource contention (see [`PinCell`]) so the runtime's `Busy`
//! contract is exercised rather than vacuous.

mod arena;
mod array;
mod context;
mod error;
mod ids;
mod lco;
mod pin;
mod world;

pub use arena::Arena;
pub use array::GlobalArray;
pub use context::LocalityContext;
pub use error::RuntimeError;
pub use ids::{FutureId, GlobalHandle, LocalityId, TaskId};
pub use lco::{AndLco, Future, ReduceLco};
pub use pin::{PinCell, PinGuard};
pub use world::{SimWorld, World};

pub mod prelude {
    pub use crate::{
        AndLco, Arena, Future, GlobalArray, GlobalHandle, LocalityContext, LocalityId, PinCell,
        PinGuard, ReduceLco, RuntimeError, SimWorld, World,
    };
}
