//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandOutput`] for the streams a command writes to
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::Result;
use crate::report::{ConsoleReporter, OutputMode, StagehandTheme};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing to `output`.
    fn execute(&self, output: &mut CommandOutput<'_>) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Output streams and presentation settings handed to a command.
pub struct CommandOutput<'a> {
    pub mode: OutputMode,
    pub theme: StagehandTheme,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl<'a> CommandOutput<'a> {
    pub fn new(
        mode: OutputMode,
        theme: StagehandTheme,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
    ) -> Self {
        Self {
            mode,
            theme,
            out,
            err,
        }
    }

    /// Write a line to the output stream.
    pub fn message(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "{}", msg)?;
        Ok(())
    }

    /// Write a themed error line to the error stream.
    pub fn error(&mut self, msg: &str) -> Result<()> {
        let line = self.theme.format_error(msg);
        writeln!(self.err, "{}", line)?;
        Ok(())
    }

    /// Console reporter over these streams.
    pub fn reporter<'b>(
        &'b mut self,
        mode: OutputMode,
    ) -> ConsoleReporter<&'b mut (dyn Write + 'a), &'b mut (dyn Write + 'a)> {
        ConsoleReporter::new(mode, self.theme.clone(), &mut *self.out, &mut *self.err)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, output: &mut CommandOutput<'_>) -> Result<CommandResult> {
        let config_path = cli.config.as_deref();
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(&self.project_root, config_path, args.clone())
                    .execute(output)
            }
            Some(Commands::Steps(args)) => {
                super::steps::StepsCommand::new(args.clone()).execute(output)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(&self.project_root, config_path, args.clone())
                    .execute(output)
            }
            None => super::run::RunCommand::new(&self.project_root, config_path, RunArgs::default())
                .execute(output),
        }
    }
}
