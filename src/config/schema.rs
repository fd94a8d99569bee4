//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `stagehand.yml` file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::bootstrap::HeadlessSettings;

/// Root configuration structure for stagehand.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Application name (for display purposes)
    pub app_name: String,

    /// Window to open
    pub window: WindowConfig,

    /// Validation layer settings
    pub validation: ValidationConfig,

    /// Device extensions a physical device must support
    pub device_extensions: Vec<String>,

    /// Compiled shader locations; built-in placeholders when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaders: Option<ShaderPaths>,

    /// Simulated platform and injected faults
    pub platform: HeadlessSettings,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            app_name: "stagehand".to_string(),
            window: WindowConfig::default(),
            validation: ValidationConfig::default(),
            device_extensions: vec!["VK_KHR_swapchain".to_string()],
            shaders: None,
            platform: HeadlessSettings::default(),
        }
    }
}

/// Window dimensions and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "stagehand".to_string(),
        }
    }
}

/// Whether validation layers are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Enabled,
    Disabled,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Validation layer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    pub layers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            layers: vec!["VK_LAYER_LUNARG_standard_validation".to_string()],
        }
    }
}

impl ValidationConfig {
    pub fn is_enabled(&self) -> bool {
        self.mode == ValidationMode::Enabled
    }
}

/// Paths to compiled vertex and fragment shaders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_plain_window() {
        let config = BootConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.device_extensions, vec!["VK_KHR_swapchain"]);
        assert!(config.shaders.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: BootConfig = serde_yaml::from_str(
            r#"
window:
  width: 1024
validation:
  mode: disabled
"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert!(!config.validation.is_enabled());
        assert_eq!(config.validation.layers.len(), 1);
    }

    #[test]
    fn shader_paths_parse() {
        let config: BootConfig = serde_yaml::from_str(
            "shaders:\n  vertex: a.vert.spv\n  fragment: a.frag.spv\n",
        )
        .unwrap();
        let shaders = config.shaders.unwrap();
        assert_eq!(shaders.vertex, PathBuf::from("a.vert.spv"));
    }

    #[test]
    fn unknown_validation_mode_is_rejected() {
        let result: Result<BootConfig, _> = serde_yaml::from_str("validation:\n  mode: maybe\n");
        assert!(result.is_err());
    }
}
