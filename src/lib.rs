//! Stagehand - staged initialization with guaranteed reverse-order teardown.
//!
//! Stagehand runs an ordered list of fallible steps against a shared
//! context, stops at the first failure, and records every acquired resource
//! so it can be released newest-first exactly once. On top of that engine it
//! provides a sixteen-step window and graphics bootstrap that runs against an
//! in-memory platform.
//!
//! # Modules
//!
//! - [`steps`] - Steps and their outcomes
//! - [`runner`] - Sequence execution and the run/teardown lifecycle
//! - [`ledger`] - Resource registration and reverse-order release
//! - [`context`] - Explicit presence for context fields
//! - [`report`] - Diagnostics sinks (tracing, console, mock)
//! - [`bootstrap`] - Window and graphics bring-up
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use stagehand::ledger::ResourceLedger;
//! use stagehand::report::MockReporter;
//! use stagehand::runner::execute;
//! use stagehand::steps::{SequenceOutcome, Step, StepOutcome};
//!
//! type Log = Vec<String>;
//!
//! let steps = vec![
//!     Step::new("A", |log: &mut Log| {
//!         log.push("run A".into());
//!         StepOutcome::Ok
//!     })
//!     .on_commit(|_, ledger| {
//!         ledger.register("a", 1, |log: &mut Log| {
//!             log.push("release A".into());
//!             Ok(())
//!         })
//!     }),
//!     Step::new("B", |_: &mut Log| StepOutcome::failed(42, "x")),
//! ];
//!
//! let mut log = Log::new();
//! let mut ledger = ResourceLedger::new();
//! let mut reporter = MockReporter::new();
//! let outcome = execute(&mut log, &mut ledger, "demo", &steps, &mut reporter);
//! assert_eq!(outcome, SequenceOutcome::Failed { index: 1, code: 42, message: "x".into() });
//!
//! ledger.release_all(&mut log, &mut reporter);
//! assert_eq!(log, vec!["run A", "release A"]);
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod ledger;
pub mod report;
pub mod runner;
pub mod steps;

pub use error::{Result, StagehandError};
