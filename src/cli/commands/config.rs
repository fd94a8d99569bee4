//! Config command implementation.
//!
//! The `stagehand config` command shows resolved configuration.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{find_config, load_config};
use crate::error::{Result, StagehandError};
use crate::report::OutputMode;

use super::dispatcher::{Command, CommandOutput, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn source(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| find_config(&self.project_root))
    }
}

impl Command for ConfigCommand {
    fn execute(&self, output: &mut CommandOutput<'_>) -> Result<CommandResult> {
        let config = load_config(self.config_path.as_deref(), &self.project_root)?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| StagehandError::Other(e.into()))?;
            output.message(&json)?;
            return Ok(CommandResult::success());
        }

        if output.mode != OutputMode::Quiet {
            let source = match self.source() {
                Some(path) => path.display().to_string(),
                None => "defaults".to_string(),
            };
            output.message(&format!("# {}", source))?;
        }
        let yaml = serde_yaml::to_string(&config).map_err(|e| StagehandError::Other(e.into()))?;
        output.message(yaml.trim_end())?;

        Ok(CommandResult::success())
    }
}
