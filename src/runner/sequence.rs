//! Sequence execution.

use crate::ledger::ResourceLedger;
use crate::report::Reporter;
use crate::steps::{SequenceOutcome, Step, StepOutcome};

/// Run `steps` in order against `context`, stopping at the first failure.
///
/// Each step is reported as `(index, description)` before it is invoked.
/// When a step returns `Ok` its commit hook runs against `ledger`; a failing
/// step commits nothing and no later step runs. An empty list succeeds.
pub fn execute<C>(
    context: &mut C,
    ledger: &mut ResourceLedger<C>,
    sequence: &str,
    steps: &[Step<'_, C>],
    reporter: &mut dyn Reporter,
) -> SequenceOutcome {
    reporter.sequence_started(sequence, steps.len());

    for (index, step) in steps.iter().enumerate() {
        reporter.step_started(index, step.description());

        match step.run(context) {
            StepOutcome::Ok => step.commit(context, ledger),
            StepOutcome::Failed(failure) => {
                reporter.sequence_failed(sequence, index, &failure);
                return SequenceOutcome::failed_at(index, failure);
            }
        }
    }

    reporter.sequence_finished(sequence);
    SequenceOutcome::Ok
}

/// A runner bound to one diagnostics sink.
pub struct SequenceRunner<'r> {
    reporter: &'r mut dyn Reporter,
}

impl<'r> SequenceRunner<'r> {
    pub fn new(reporter: &'r mut dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Run a sequence. See [`execute`].
    pub fn execute<C>(
        &mut self,
        context: &mut C,
        ledger: &mut ResourceLedger<C>,
        sequence: &str,
        steps: &[Step<'_, C>],
    ) -> SequenceOutcome {
        execute(context, ledger, sequence, steps, &mut *self.reporter)
    }
}
