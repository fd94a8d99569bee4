//! Run/teardown state machine for one context.
//!
//! ```text
//! NotStarted → Running → (Completed | FailedAt(i)) → TearingDown → TornDown
//! ```
//!
//! Teardown is entered from either terminal run state and is the only way to
//! reach `TornDown`. Nothing re-enters `Running` once teardown has begun.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, StagehandError};
use crate::ledger::{ResourceLedger, TeardownReport};
use crate::report::{Reporter, TracingReporter};
use crate::steps::{SequenceOutcome, Step};

use super::sequence::execute;

/// Phase of a [`Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum RunPhase {
    NotStarted,
    Running,
    Completed,
    FailedAt(usize),
    TearingDown,
    TornDown,
}

impl RunPhase {
    /// Check whether the run phase has ended and teardown may begin.
    pub fn can_tear_down(&self) -> bool {
        matches!(self, Self::Completed | Self::FailedAt(_))
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::FailedAt(index) => write!(f, "failed at step {}", index),
            Self::TearingDown => write!(f, "tearing down"),
            Self::TornDown => write!(f, "torn down"),
        }
    }
}

/// Owns a shared context and its ledger for one run and one teardown.
///
/// A lifecycle that ran but is dropped without [`teardown`](Self::teardown)
/// releases its ledger on drop, reporting through [`TracingReporter`]. This
/// includes a lifecycle unwound by a panicking step while still `Running`.
pub struct Lifecycle<C> {
    context: C,
    ledger: ResourceLedger<C>,
    phase: RunPhase,
}

impl<C> Lifecycle<C> {
    pub fn new(context: C) -> Self {
        Self {
            context,
            ledger: ResourceLedger::new(),
            phase: RunPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Run the sequence once.
    ///
    /// Only legal before anything has run; the outcome moves the lifecycle to
    /// `Completed` or `FailedAt(index)`.
    pub fn run(
        &mut self,
        sequence: &str,
        steps: &[Step<'_, C>],
        reporter: &mut dyn Reporter,
    ) -> Result<SequenceOutcome> {
        if self.phase != RunPhase::NotStarted {
            return Err(self.invalid("run"));
        }

        self.phase = RunPhase::Running;
        let outcome = execute(
            &mut self.context,
            &mut self.ledger,
            sequence,
            steps,
            reporter,
        );
        self.phase = match outcome.failing_index() {
            Some(index) => RunPhase::FailedAt(index),
            None => RunPhase::Completed,
        };
        Ok(outcome)
    }

    /// Release everything the run acquired, newest first.
    ///
    /// Calling this again after teardown finished returns an empty report.
    pub fn teardown(&mut self, reporter: &mut dyn Reporter) -> Result<TeardownReport> {
        match self.phase {
            RunPhase::TornDown => Ok(TeardownReport::default()),
            phase if phase.can_tear_down() => {
                self.phase = RunPhase::TearingDown;
                let report = self.ledger.release_all(&mut self.context, reporter);
                self.phase = RunPhase::TornDown;
                Ok(report)
            }
            _ => Err(self.invalid("tear down")),
        }
    }

    /// Consume the lifecycle after teardown and return the drained context.
    pub fn into_context(mut self) -> Result<C>
    where
        C: Default,
    {
        if self.phase != RunPhase::TornDown {
            return Err(self.invalid("take the context"));
        }
        Ok(std::mem::take(&mut self.context))
    }

    fn invalid(&self, action: &str) -> StagehandError {
        StagehandError::InvalidTransition {
            from: self.phase.to_string(),
            action: action.to_string(),
        }
    }
}

impl<C> Drop for Lifecycle<C> {
    fn drop(&mut self) {
        let ran = self.phase == RunPhase::Running || self.phase.can_tear_down();
        if ran && !self.ledger.is_empty() {
            tracing::warn!(
                phase = %self.phase,
                resources = self.ledger.len(),
                "Lifecycle dropped without teardown; releasing"
            );
            self.ledger
                .release_all(&mut self.context, &mut TracingReporter::new());
            self.phase = RunPhase::TornDown;
        }
    }
}

impl<C> fmt::Debug for Lifecycle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("phase", &self.phase)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
