//! Integration tests for config module public API.

use stagehand::bootstrap::ResourceKind;
use stagehand::config::{load_config, validate, BootConfig, ValidationMode, CONFIG_FILE_NAME};
use stagehand::StagehandError;
use std::fs;
use tempfile::TempDir;

#[test]
fn full_config_workflow() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        r#"
app_name: TestApp
window:
  width: 1280
  height: 720
  title: Test
validation:
  mode: disabled
device_extensions: [VK_KHR_swapchain, VK_KHR_maintenance1]
platform:
  devices:
    - name: Test GPU
      discrete: true
      extensions: [VK_KHR_swapchain, VK_KHR_maintenance1]
      queue_families:
        - { graphics: true, present: true }
  faults:
    fail_acquire: { kind: swapchain, nth: 1 }
    fail_release: [pipeline]
"#,
    )
    .unwrap();

    let config = load_config(None, temp.path()).unwrap();
    validate(&config).unwrap();

    assert_eq!(config.app_name, "TestApp");
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.validation.mode, ValidationMode::Disabled);
    assert_eq!(config.device_extensions.len(), 2);
    assert_eq!(config.platform.devices[0].queue_families[0].count, 1);
    assert_eq!(
        config.platform.faults.fail_acquire.map(|f| f.kind),
        Some(ResourceKind::Swapchain)
    );
    assert_eq!(config.platform.faults.fail_release, vec![ResourceKind::Pipeline]);
    // Unspecified platform fields keep their defaults.
    assert_eq!(config.platform.surface.min_images, 2);
}

#[test]
fn explicit_path_overrides_discovery() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(CONFIG_FILE_NAME), "app_name: Discovered").unwrap();
    let explicit = temp.path().join("other.yml");
    fs::write(&explicit, "app_name: Explicit").unwrap();

    let config = load_config(Some(&explicit), temp.path()).unwrap();
    assert_eq!(config.app_name, "Explicit");
}

#[test]
fn invalid_values_fail_validation() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        "window: { width: 0, height: 0 }\nvalidation: { mode: enabled, layers: [] }\n",
    )
    .unwrap();

    let config = load_config(None, temp.path()).unwrap();
    let err = validate(&config).unwrap_err();
    assert!(matches!(err, StagehandError::ConfigValidation { .. }));
    assert!(err.to_string().contains("Window size"));
    assert!(err.to_string().contains("no layers"));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(CONFIG_FILE_NAME), "window: [1, 2").unwrap();
    let err = load_config(None, temp.path()).unwrap_err();
    assert!(matches!(err, StagehandError::ConfigParse { .. }));
}

#[test]
fn defaults_are_valid() {
    validate(&BootConfig::default()).unwrap();
}

#[test]
fn oversized_surface_image_count_fails_validation() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        "platform:\n  surface:\n    min_images: 4294967295\n    max_images: 0\n    formats: [X]\n    present_modes: [FIFO]\n",
    )
    .unwrap();

    let config = load_config(None, temp.path()).unwrap();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("min_images"));
}
