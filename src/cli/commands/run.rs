//! Run command implementation.
//!
//! The `stagehand run` command brings up the graphics context against the
//! headless platform, then tears it down.

use std::path::{Path, PathBuf};

use crate::bootstrap::{run_bootstrap, AcquireFault, BootstrapReport, HeadlessPlatform};
use crate::cli::args::RunArgs;
use crate::config::{load_config, validate, BootConfig, ValidationMode};
use crate::error::{Result, StagehandError};
use crate::report::{FanoutReporter, OutputMode, TracingReporter};

use super::dispatcher::{Command, CommandOutput, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Apply command-line fault and validation overrides.
    fn apply_overrides(&self, config: &mut BootConfig) {
        if let Some(kind) = self.args.fail_at {
            config.platform.faults.fail_acquire = Some(AcquireFault { kind, nth: 1 });
        }
        config
            .platform
            .faults
            .fail_release
            .extend(self.args.fail_release.iter().copied());
        if self.args.fail_record {
            config.platform.faults.fail_record = true;
        }
        if self.args.no_validation {
            config.validation.mode = ValidationMode::Disabled;
        }
    }

    fn print_summary(&self, output: &mut CommandOutput<'_>, report: &BootstrapReport) -> Result<()> {
        if self.args.json {
            let json =
                serde_json::to_string_pretty(report).map_err(|e| StagehandError::Other(e.into()))?;
            return output.message(&json);
        }

        if let (Some(step), Some(code)) = (report.failed_step(), report.failure_code()) {
            let line = output
                .theme
                .format_warning(&format!("Stopped at \"{}\": {}", step, code));
            output.message(&line)?;
        }
        Ok(())
    }
}

impl Command for RunCommand {
    fn execute(&self, output: &mut CommandOutput<'_>) -> Result<CommandResult> {
        let mut config = load_config(self.config_path.as_deref(), &self.project_root)?;
        self.apply_overrides(&mut config);
        validate(&config)?;

        tracing::debug!(app = %config.app_name, "Starting bootstrap");
        let platform = HeadlessPlatform::new(config.platform.clone());
        let mode = if self.args.json {
            OutputMode::Silent
        } else {
            output.mode
        };

        let report = {
            let mut console = output.reporter(mode);
            let mut traced = TracingReporter::new();
            let mut reporter = FanoutReporter::new().with(&mut console).with(&mut traced);
            run_bootstrap(config, platform, &mut reporter)?
        };

        self.print_summary(output, &report)?;

        if report.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
