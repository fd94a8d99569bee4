//! Step and sequence outcomes.
//!
//! A step either fully succeeds or fully fails; there is no partial or retry
//! outcome. A sequence outcome carries the first failure, tagged with the
//! zero-based index of the step that produced it.

use std::fmt;

use serde::Serialize;

/// Failure data reported by a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Domain error code (opaque to the engine).
    pub code: i32,
    /// Human-readable diagnostic.
    pub message: String,
}

/// Result of running one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step fully succeeded; anything it acquired is committed.
    Ok,
    /// The step failed and acquired nothing.
    Failed(StepFailure),
}

impl StepOutcome {
    /// Create a failed outcome.
    pub fn failed(code: i32, message: impl Into<String>) -> Self {
        Self::Failed(StepFailure {
            code,
            message: message.into(),
        })
    }

    /// Check whether the step succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl<E: Into<StepFailure>> From<std::result::Result<(), E>> for StepOutcome {
    fn from(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(e) => Self::Failed(e.into()),
        }
    }
}

/// Aggregate result of running a sequence.
///
/// If `index = i`, steps `0..i` all reported `Ok` and no step past `i` ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SequenceOutcome {
    /// Every step succeeded (or the sequence was empty).
    Ok,
    /// The step at `index` was the first to fail.
    Failed {
        index: usize,
        code: i32,
        message: String,
    },
}

impl SequenceOutcome {
    /// Build a failed outcome from a step failure at `index`.
    pub fn failed_at(index: usize, failure: StepFailure) -> Self {
        Self::Failed {
            index,
            code: failure.code,
            message: failure.message,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Index of the failing step, if any.
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            Self::Ok => None,
            Self::Failed { index, .. } => Some(*index),
        }
    }

    /// The failing step's code and message, if any.
    pub fn failure(&self) -> Option<StepFailure> {
        match self {
            Self::Ok => None,
            Self::Failed { code, message, .. } => Some(StepFailure {
                code: *code,
                message: message.clone(),
            }),
        }
    }
}

impl fmt::Display for SequenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Failed {
                index,
                code,
                message,
            } => write!(
                f,
                "failed on index {} with error code {}: {}",
                index, code, message
            ),
        }
    }
}
