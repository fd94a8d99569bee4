//! Steps command implementation.
//!
//! The `stagehand steps` command lists the bootstrap steps in the order they
//! run, with the index a failure would report.

use serde::Serialize;

use crate::bootstrap::{bootstrap_sequence, HeadlessPlatform, SEQUENCE_NAME};
use crate::cli::args::StepsArgs;
use crate::error::{Result, StagehandError};

use super::dispatcher::{Command, CommandOutput, CommandResult};

#[derive(Debug, Serialize)]
struct StepListing {
    index: usize,
    description: String,
    acquires: bool,
}

/// The steps command implementation.
pub struct StepsCommand {
    args: StepsArgs,
}

impl StepsCommand {
    pub fn new(args: StepsArgs) -> Self {
        Self { args }
    }

    fn listing() -> Vec<StepListing> {
        bootstrap_sequence::<HeadlessPlatform>()
            .iter()
            .enumerate()
            .map(|(index, step)| StepListing {
                index,
                description: step.description().to_string(),
                acquires: step.acquires(),
            })
            .collect()
    }
}

impl Command for StepsCommand {
    fn execute(&self, output: &mut CommandOutput<'_>) -> Result<CommandResult> {
        let steps = Self::listing();

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&steps).map_err(|e| StagehandError::Other(e.into()))?;
            output.message(&json)?;
            return Ok(CommandResult::success());
        }

        let header = output.theme.format_header(SEQUENCE_NAME);
        output.message(&header)?;
        for step in &steps {
            let mut line = output.theme.format_step(step.index, &step.description);
            if !step.acquires {
                line.push_str(" (no resources)");
            }
            output.message(&line)?;
        }
        Ok(CommandResult::success())
    }
}
