//! Mock reporter for testing.
//!
//! `MockReporter` implements [`Reporter`] and captures every event for later
//! assertion.
//!
//! # Example
//!
//! ```
//! use stagehand::report::{MockReporter, Reporter};
//!
//! let mut reporter = MockReporter::new();
//! reporter.step_started(0, "Create surface");
//! reporter.step_started(1, "Pick device");
//!
//! assert_eq!(reporter.steps_started(), vec![(0, "Create surface".to_string()), (1, "Pick device".to_string())]);
//! ```

use crate::ledger::{ReleaseError, TeardownReport};
use crate::steps::StepFailure;

use super::Reporter;

/// A captured reporter event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    SequenceStarted {
        sequence: String,
        total: usize,
    },
    StepStarted {
        index: usize,
        description: String,
    },
    SequenceFailed {
        sequence: String,
        index: usize,
        code: i32,
        message: String,
    },
    SequenceFinished {
        sequence: String,
    },
    TeardownStarted {
        count: usize,
    },
    Released {
        kind: String,
        handle: String,
    },
    ReleaseFailed {
        kind: String,
        handle: String,
        code: i32,
        message: String,
    },
    TeardownFinished {
        released: usize,
        failed: usize,
    },
}

/// Reporter that records events instead of printing them.
#[derive(Debug, Default)]
pub struct MockReporter {
    events: Vec<ReportEvent>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, in emission order.
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// `(index, description)` of every started step.
    pub fn steps_started(&self) -> Vec<(usize, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::StepStarted { index, description } => {
                    Some((*index, description.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Kinds of released resources, in release order (failed releases included).
    pub fn release_order(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Released { kind, .. } | ReportEvent::ReleaseFailed { kind, .. } => {
                    Some(kind.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Number of teardown passes that released anything.
    pub fn teardowns_started(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ReportEvent::TeardownStarted { .. }))
            .count()
    }

    /// Clear captured events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Reporter for MockReporter {
    fn sequence_started(&mut self, sequence: &str, total: usize) {
        self.events.push(ReportEvent::SequenceStarted {
            sequence: sequence.to_string(),
            total,
        });
    }

    fn step_started(&mut self, index: usize, description: &str) {
        self.events.push(ReportEvent::StepStarted {
            index,
            description: description.to_string(),
        });
    }

    fn sequence_failed(&mut self, sequence: &str, index: usize, failure: &StepFailure) {
        self.events.push(ReportEvent::SequenceFailed {
            sequence: sequence.to_string(),
            index,
            code: failure.code,
            message: failure.message.clone(),
        });
    }

    fn sequence_finished(&mut self, sequence: &str) {
        self.events.push(ReportEvent::SequenceFinished {
            sequence: sequence.to_string(),
        });
    }

    fn teardown_started(&mut self, count: usize) {
        self.events.push(ReportEvent::TeardownStarted { count });
    }

    fn resource_released(&mut self, kind: &str, handle: &str) {
        self.events.push(ReportEvent::Released {
            kind: kind.to_string(),
            handle: handle.to_string(),
        });
    }

    fn release_failed(&mut self, kind: &str, handle: &str, error: &ReleaseError) {
        self.events.push(ReportEvent::ReleaseFailed {
            kind: kind.to_string(),
            handle: handle.to_string(),
            code: error.code,
            message: error.message.clone(),
        });
    }

    fn teardown_finished(&mut self, report: &TeardownReport) {
        self.events.push(ReportEvent::TeardownFinished {
            released: report.released.len(),
            failed: report.failures.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_failures_verbatim() {
        let mut reporter = MockReporter::new();
        reporter.sequence_failed(
            "Init",
            2,
            &StepFailure {
                code: 42,
                message: "x".into(),
            },
        );
        assert_eq!(
            reporter.events(),
            &[ReportEvent::SequenceFailed {
                sequence: "Init".into(),
                index: 2,
                code: 42,
                message: "x".into(),
            }]
        );
    }

    #[test]
    fn release_order_includes_failed_releases() {
        let mut reporter = MockReporter::new();
        reporter.resource_released("swapchain", "0x3");
        reporter.release_failed("device", "0x2", &ReleaseError::new(1, "busy"));
        reporter.resource_released("instance", "0x1");
        assert_eq!(
            reporter.release_order(),
            vec!["swapchain", "device", "instance"]
        );
    }

    #[test]
    fn clear_drops_events() {
        let mut reporter = MockReporter::new();
        reporter.teardown_started(1);
        reporter.clear();
        assert!(reporter.events().is_empty());
    }
}
