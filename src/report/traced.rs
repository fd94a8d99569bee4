//! Reporter backed by `tracing` events.

use tracing::{debug, error, info, warn};

use crate::ledger::{ReleaseError, TeardownReport};
use crate::steps::StepFailure;

use super::Reporter;

/// Emits every report as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn sequence_started(&mut self, sequence: &str, total: usize) {
        info!(sequence, total, "Running task sequence: {}", sequence);
    }

    fn step_started(&mut self, index: usize, description: &str) {
        info!(index, "{}. {}", index, description);
    }

    fn sequence_failed(&mut self, sequence: &str, index: usize, failure: &StepFailure) {
        error!(
            sequence,
            index,
            code = failure.code,
            "Task sequence \"{}\" failed on index {} with error code: {} and error message \"{}\"",
            sequence,
            index,
            failure.code,
            failure.message
        );
    }

    fn sequence_finished(&mut self, sequence: &str) {
        info!(sequence, "Finished task sequence: {}", sequence);
    }

    fn teardown_started(&mut self, count: usize) {
        debug!(count, "Releasing {} resources", count);
    }

    fn resource_released(&mut self, kind: &str, handle: &str) {
        debug!(kind, handle, "Released {}", kind);
    }

    fn release_failed(&mut self, kind: &str, handle: &str, error: &ReleaseError) {
        warn!(kind, handle, code = error.code, "Failed to release {}: {}", kind, error);
    }

    fn teardown_finished(&mut self, report: &TeardownReport) {
        debug!(
            released = report.released.len(),
            failed = report.failures.len(),
            "Teardown finished"
        );
    }
}
