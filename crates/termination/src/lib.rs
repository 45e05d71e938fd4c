//! The global termination detector (`spec.md` §4.2): a two-phase
//! nonzero-activity distributed all-reduce loop that decides when an
//! SSSP run (or an adjacency-list construction phase) has reached
//! quiescence.

mod detector;

pub use detector::Detector;
