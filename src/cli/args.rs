//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::bootstrap::ResourceKind;

/// Stagehand - staged window and graphics bring-up with ordered teardown.
#[derive(Debug, Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides ./stagehand.yml)
    #[arg(short, long, global = true, env = "STAGEHAND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output, including every release
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bring up the graphics context and tear it down (default)
    Run(RunArgs),

    /// List the bootstrap steps in execution order
    Steps(StepsArgs),

    /// Show resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Make the first acquisition of this resource kind fail
    #[arg(long, value_name = "KIND")]
    pub fail_at: Option<ResourceKind>,

    /// Make releases of this resource kind report an error (repeatable)
    #[arg(long, value_name = "KIND")]
    pub fail_release: Vec<ResourceKind>,

    /// Make command buffer recording fail
    #[arg(long)]
    pub fail_record: bool,

    /// Disable validation layers
    #[arg(long)]
    pub no_validation: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `steps` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StepsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["stagehand"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_parses_fault_flags() {
        let cli = Cli::try_parse_from([
            "stagehand",
            "run",
            "--fail-at",
            "swapchain",
            "--fail-release",
            "pipeline",
            "--fail-release",
            "image_view",
            "--no-validation",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.fail_at, Some(ResourceKind::Swapchain));
                assert_eq!(
                    args.fail_release,
                    vec![ResourceKind::Pipeline, ResourceKind::ImageView]
                );
                assert!(args.no_validation);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["stagehand", "run", "--fail-at", "teapot"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stagehand", "steps", "--verbose", "--json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Steps(StepsArgs { json: true }))));
    }
}
