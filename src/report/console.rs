//! Human-readable terminal reporter.

use std::io::Write;

use crate::ledger::{ReleaseError, TeardownReport};
use crate::steps::StepFailure;

use super::output::OutputMode;
use super::theme::StagehandTheme;
use super::Reporter;

/// Writes progress to one stream and failures to another, honoring an
/// [`OutputMode`].
///
/// The CLI hands in its stdout/stderr; tests pass in buffers.
pub struct ConsoleReporter<O: Write, E: Write> {
    mode: OutputMode,
    theme: StagehandTheme,
    out: O,
    err: E,
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(mode: OutputMode, theme: StagehandTheme, out: O, err: E) -> Self {
        Self {
            mode,
            theme,
            out,
            err,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Consume the reporter and return its writers.
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    // Terminal write failures are not worth aborting a run or a teardown for.
    fn line(&mut self, msg: &str) {
        let _ = writeln!(self.out, "{}", msg);
    }

    fn error_line(&mut self, msg: &str) {
        let _ = writeln!(self.err, "{}", msg);
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn sequence_started(&mut self, sequence: &str, _total: usize) {
        if self.mode.shows_steps() {
            let msg = self.theme.format_header(sequence);
            self.line(&msg);
        }
    }

    fn step_started(&mut self, index: usize, description: &str) {
        if self.mode.shows_steps() {
            let msg = self.theme.format_step(index, description);
            self.line(&msg);
        }
    }

    fn sequence_failed(&mut self, sequence: &str, index: usize, failure: &StepFailure) {
        let msg = self.theme.format_error(&format!(
            "\"{}\" failed on step {} (error code {}): {}",
            sequence, index, failure.code, failure.message
        ));
        self.error_line(&msg);
    }

    fn sequence_finished(&mut self, sequence: &str) {
        if self.mode.shows_status() {
            let msg = self.theme.format_success(&format!("Finished {}", sequence));
            self.line(&msg);
        }
    }

    fn teardown_started(&mut self, count: usize) {
        if self.mode.shows_steps() {
            let msg = self
                .theme
                .format_header(&format!("Releasing {} resources", count));
            self.line(&msg);
        }
    }

    fn resource_released(&mut self, kind: &str, handle: &str) {
        if self.mode.shows_releases() {
            let msg = self.theme.format_release(kind, handle);
            self.line(&msg);
        }
    }

    fn release_failed(&mut self, kind: &str, handle: &str, error: &ReleaseError) {
        let msg = self
            .theme
            .format_warning(&format!("Could not release {} {}: {}", kind, handle, error));
        self.error_line(&msg);
    }

    fn teardown_finished(&mut self, report: &TeardownReport) {
        if !self.mode.shows_status() {
            return;
        }
        let msg = if report.is_clean() {
            self.theme
                .format_success(&format!("Released {} resources", report.released.len()))
        } else {
            self.theme.format_warning(&format!(
                "Released {} resources, {} failed",
                report.released.len(),
                report.failures.len()
            ))
        };
        self.line(&msg);
    }
}
