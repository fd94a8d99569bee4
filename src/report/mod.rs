//! Diagnostics sinks for sequence execution and teardown.
//!
//! This module provides:
//! - [`Reporter`] trait, the injected sink every runner and ledger reports to
//! - [`TracingReporter`] for structured `tracing` events
//! - [`ConsoleReporter`] for human-readable terminal output
//! - [`MockReporter`] for capturing events in tests
//! - [`FanoutReporter`] for forwarding to several sinks at once
//!
//! Reporting is observability only: no reporter can influence which steps run
//! or what a sequence returns.
//!
//! # Example
//!
//! ```
//! use stagehand::report::{MockReporter, ReportEvent, Reporter};
//!
//! let mut reporter = MockReporter::new();
//! reporter.sequence_started("Initialize", 2);
//! reporter.step_started(0, "Open window");
//!
//! assert_eq!(
//!     reporter.events()[1],
//!     ReportEvent::StepStarted { index: 0, description: "Open window".into() }
//! );
//! ```

pub mod console;
pub mod mock;
pub mod output;
pub mod theme;
pub mod traced;

pub use console::ConsoleReporter;
pub use mock::{MockReporter, ReportEvent};
pub use output::OutputMode;
pub use theme::{should_use_colors, StagehandTheme};
pub use traced::TracingReporter;

use crate::ledger::{ReleaseError, TeardownReport};
use crate::steps::StepFailure;

/// Sink for sequence and teardown diagnostics.
///
/// This trait allows capturing output in tests and swapping the logging
/// backend without touching the engine.
pub trait Reporter {
    /// A sequence is about to run `total` steps.
    fn sequence_started(&mut self, sequence: &str, total: usize);

    /// The step at `index` is about to be invoked.
    fn step_started(&mut self, index: usize, description: &str);

    /// The step at `index` failed; no further steps will run.
    fn sequence_failed(&mut self, sequence: &str, index: usize, failure: &StepFailure);

    /// Every step succeeded.
    fn sequence_finished(&mut self, sequence: &str);

    /// Teardown is about to release `count` resources.
    fn teardown_started(&mut self, count: usize);

    /// A resource was released.
    fn resource_released(&mut self, kind: &str, handle: &str);

    /// A release action reported an error; teardown continues.
    fn release_failed(&mut self, kind: &str, handle: &str, error: &ReleaseError);

    /// Teardown finished.
    fn teardown_finished(&mut self, report: &TeardownReport);
}

/// Forwards every event to each inner reporter, in order.
#[derive(Default)]
pub struct FanoutReporter<'a> {
    sinks: Vec<&'a mut dyn Reporter>,
}

impl<'a> FanoutReporter<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink.
    pub fn with(mut self, sink: &'a mut dyn Reporter) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Reporter for FanoutReporter<'_> {
    fn sequence_started(&mut self, sequence: &str, total: usize) {
        for sink in &mut self.sinks {
            sink.sequence_started(sequence, total);
        }
    }

    fn step_started(&mut self, index: usize, description: &str) {
        for sink in &mut self.sinks {
            sink.step_started(index, description);
        }
    }

    fn sequence_failed(&mut self, sequence: &str, index: usize, failure: &StepFailure) {
        for sink in &mut self.sinks {
            sink.sequence_failed(sequence, index, failure);
        }
    }

    fn sequence_finished(&mut self, sequence: &str) {
        for sink in &mut self.sinks {
            sink.sequence_finished(sequence);
        }
    }

    fn teardown_started(&mut self, count: usize) {
        for sink in &mut self.sinks {
            sink.teardown_started(count);
        }
    }

    fn resource_released(&mut self, kind: &str, handle: &str) {
        for sink in &mut self.sinks {
            sink.resource_released(kind, handle);
        }
    }

    fn release_failed(&mut self, kind: &str, handle: &str, error: &ReleaseError) {
        for sink in &mut self.sinks {
            sink.release_failed(kind, handle, error);
        }
    }

    fn teardown_finished(&mut self, report: &TeardownReport) {
        for sink in &mut self.sinks {
            sink.teardown_finished(report);
        }
    }
}
