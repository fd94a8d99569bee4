//! Stagehand CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use stagehand::cli::{Cli, CommandDispatcher, CommandOutput};
use stagehand::report::{should_use_colors, OutputMode, StagehandTheme};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, since the console already shows progress
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("stagehand=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stagehand=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Stagehand starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    let theme = if cli.no_color || !should_use_colors() {
        StagehandTheme::plain()
    } else {
        StagehandTheme::new()
    };

    let project_root = std::env::current_dir().unwrap_or_default();
    let dispatcher = CommandDispatcher::new(project_root);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut output = CommandOutput::new(output_mode, theme, &mut stdout, &mut stderr);

    match dispatcher.dispatch(&cli, &mut output) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            let _ = output.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
