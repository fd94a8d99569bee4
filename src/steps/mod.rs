//! Steps and their outcomes.
//!
//! - [`Step`] - A described unit of work against a shared context
//! - [`StepOutcome`] - `Ok` or `Failed { code, message }`
//! - [`SequenceOutcome`] - The first failure of a sequence, with its index
//!
//! # Example
//!
//! ```
//! use stagehand::steps::{Step, StepOutcome};
//!
//! let step = Step::new("Open window", |opened: &mut bool| {
//!     *opened = true;
//!     StepOutcome::Ok
//! });
//!
//! let mut opened = false;
//! assert!(step.run(&mut opened).is_ok());
//! assert!(opened);
//! ```

pub mod outcome;
pub mod step;

pub use outcome::{SequenceOutcome, StepFailure, StepOutcome};
pub use step::Step;
