//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use stagehand::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("stagehand.yml"), "window: { width: 1280, height: 720 }").unwrap();
//!
//! let config = load_config(None, temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.window.width, 1280);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{find_config, load_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use schema::{BootConfig, ShaderPaths, ValidationConfig, ValidationMode, WindowConfig};
pub use validator::{validate, validate_config, ValidationError, MAX_SURFACE_IMAGES};
