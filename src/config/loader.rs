//! Configuration file discovery and loading.

use crate::config::schema::BootConfig;
use crate::error::{Result, StagehandError};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stagehand.yml";

/// Find the config file for `project_root`, if one exists.
pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a config file from an explicit path.
pub fn load_config_file(path: &Path) -> Result<BootConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StagehandError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StagehandError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`BootConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BootConfig> {
    if content.trim().is_empty() {
        return Ok(BootConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| StagehandError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `stagehand.yml` in
/// `project_root` is used when present, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<BootConfig> {
    match explicit {
        Some(path) => load_config_file(path),
        None => match find_config(project_root) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                load_config_file(&path)
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(BootConfig::default())
            }
        },
    }
}
