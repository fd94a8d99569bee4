//! Step definition.

use std::fmt;

use crate::ledger::ResourceLedger;

use super::outcome::StepOutcome;

type Work<'a, C> = Box<dyn Fn(&mut C) -> StepOutcome + 'a>;
type Commit<'a, C> = Box<dyn Fn(&mut C, &mut ResourceLedger<C>) + 'a>;

/// One named, ordered unit of work operating on a shared context.
///
/// The optional commit hook runs only after the work returned
/// [`StepOutcome::Ok`]; it is where a step registers what it acquired.
pub struct Step<'a, C> {
    description: String,
    work: Work<'a, C>,
    commit: Option<Commit<'a, C>>,
}

impl<'a, C> Step<'a, C> {
    /// Create a step from a description and its unit of work.
    pub fn new(
        description: impl Into<String>,
        work: impl Fn(&mut C) -> StepOutcome + 'a,
    ) -> Self {
        Self {
            description: description.into(),
            work: Box::new(work),
            commit: None,
        }
    }

    /// Attach a commit hook that registers acquired resources.
    pub fn on_commit(mut self, commit: impl Fn(&mut C, &mut ResourceLedger<C>) + 'a) -> Self {
        self.commit = Some(Box::new(commit));
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check whether this step registers resources on success.
    pub fn acquires(&self) -> bool {
        self.commit.is_some()
    }

    /// Invoke the unit of work.
    pub fn run(&self, context: &mut C) -> StepOutcome {
        (self.work)(context)
    }

    /// Invoke the commit hook, if any.
    pub(crate) fn commit(&self, context: &mut C, ledger: &mut ResourceLedger<C>) {
        if let Some(commit) = &self.commit {
            commit(context, ledger);
        }
    }
}

impl<C> fmt::Debug for Step<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("description", &self.description)
            .field("acquires", &self.acquires())
            .finish()
    }
}
