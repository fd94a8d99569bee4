//! Sequence execution and run/teardown orchestration.
//!
//! - [`execute`] / [`SequenceRunner`] - run steps in order, stop at the first failure
//! - [`Lifecycle`] - own a context through one run and one teardown

pub mod lifecycle;
pub mod sequence;

pub use lifecycle::{Lifecycle, RunPhase};
pub use sequence::{execute, SequenceRunner};
