pub use crate::config::{SsspConfig, SsspKind, TerminationMode};
pub use crate::driver::{reset, sssp};
pub use crate::error::PxglError;
