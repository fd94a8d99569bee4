//! Configuration validation rules.
//!
//! - Window dimensions must be non-zero
//! - Enabled validation needs at least one layer
//! - Extension and layer names must not be blank
//! - Simulated surface image counts must be usable

use crate::config::schema::BootConfig;
use crate::error::{Result, StagehandError};

/// Largest `platform.surface.min_images` accepted.
pub const MAX_SURFACE_IMAGES: u32 = 16;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &BootConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.window.width == 0 || config.window.height == 0 {
        errors.push(ValidationError::new(
            "window-size",
            format!(
                "Window size must be non-zero, got {}x{}",
                config.window.width, config.window.height
            ),
        ));
    }

    if config.validation.is_enabled() && config.validation.layers.is_empty() {
        errors.push(ValidationError::new(
            "validation-layers",
            "Validation is enabled but no layers are listed",
        ));
    }

    for layer in &config.validation.layers {
        if layer.trim().is_empty() {
            errors.push(ValidationError::new(
                "blank-name",
                "Validation layer names must not be blank",
            ));
        }
    }

    for ext in &config.device_extensions {
        if ext.trim().is_empty() {
            errors.push(ValidationError::new(
                "blank-name",
                "Device extension names must not be blank",
            ));
        }
    }

    let surface = &config.platform.surface;
    if surface.min_images == 0 || surface.min_images > MAX_SURFACE_IMAGES {
        errors.push(ValidationError::new(
            "surface-images",
            format!(
                "platform.surface.min_images must be between 1 and {}, got {}",
                MAX_SURFACE_IMAGES, surface.min_images
            ),
        ));
    } else if surface.max_images > 0 && surface.min_images > surface.max_images {
        errors.push(ValidationError::new(
            "surface-images",
            format!(
                "platform.surface.min_images ({}) exceeds max_images ({})",
                surface.min_images, surface.max_images
            ),
        ));
    }

    if let Some(fault) = config.platform.faults.fail_acquire {
        if fault.nth == 0 {
            errors.push(ValidationError::new(
                "fault-nth",
                "fail_acquire.nth counts from 1",
            ));
        }
    }

    errors
}

/// Validate a configuration, failing on the first batch of errors.
pub fn validate(config: &BootConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(StagehandError::ConfigValidation { message })
}
