//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`stagehand run`, `stagehand steps`)
//! - Shared config discovery
//! - Consistent global flag handling

pub mod config;
pub mod dispatcher;
pub mod run;
pub mod steps;

pub use dispatcher::{Command, CommandDispatcher, CommandOutput, CommandResult};
