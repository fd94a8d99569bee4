//! Error types for stagehand operations.
//!
//! This module defines [`StagehandError`], the error type used by the
//! configuration, CLI and lifecycle layers, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Step and sequence failures are *values* ([`crate::steps::StepOutcome`],
//!   [`crate::steps::SequenceOutcome`]), never `StagehandError`
//! - Use `StagehandError` for misuse of the engine and for ambient failures
//!   (config files, IO)
//! - Use `anyhow::Error` (via `StagehandError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stagehand operations.
#[derive(Debug, Error)]
pub enum StagehandError {
    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// A lifecycle operation was attempted from a phase that does not allow it.
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    /// A context slot was filled twice.
    #[error("Slot '{slot}' is already populated")]
    SlotOccupied { slot: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for stagehand operations.
pub type Result<T> = std::result::Result<T, StagehandError>;
