//! Integration tests for the stagehand binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn stagehand(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("stagehand"));
    cmd.current_dir(dir.path())
        .env_remove("STAGEHAND_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("stagehand.yml"), config).unwrap();
    temp
}

#[test]
fn cli_no_args_runs_bootstrap() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialize window and graphics"))
        .stdout(predicate::str::contains("Released "));
    Ok(())
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagehand"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("reverse").or(predicate::str::contains("teardown")));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagehand"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_run_fail_at_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .args(["run", "--fail-at", "render_pass"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed on step 10 (error code 9)"))
        .stdout(predicate::str::contains("Released"));
    Ok(())
}

#[test]
fn cli_run_fail_release_keeps_releasing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .args(["run", "--fail-release", "device", "--no-validation", "--verbose"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not release device"))
        .stdout(predicate::str::contains("↩ window"))
        .stdout(predicate::str::contains("Released 15 resources, 1 failed"));
    Ok(())
}

#[test]
fn cli_run_json_summary() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let output = stagehand(&temp)
        .args(["run", "--json", "--fail-at", "surface"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["outcome"]["status"], "failed");
    assert_eq!(json["outcome"]["index"], 4);
    assert_eq!(json["outcome"]["code"], 4);
    Ok(())
}

#[test]
fn cli_run_uses_project_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("platform:\n  faults:\n    fail_record: true\n");
    stagehand(&temp)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error code 19"));
    Ok(())
}

#[test]
fn cli_run_invalid_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("window: { width: 0 }\n");
    stagehand(&temp)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn cli_run_rejects_unusable_surface_image_count() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(
        "platform:\n  surface:\n    min_images: 4294967295\n    max_images: 0\n    formats: [X]\n    present_modes: [FIFO]\n",
    );
    stagehand(&temp)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("min_images"))
        .stderr(predicate::str::contains("panicked").not());
    Ok(())
}

#[test]
fn cli_missing_explicit_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .args(["--config", "nope.yml", "run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_config_env_var_is_honored() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("custom.yml");
    fs::write(&path, "app_name: FromEnv\n")?;
    stagehand(&temp)
        .env("STAGEHAND_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("app_name: FromEnv"));
    Ok(())
}

#[test]
fn cli_steps_lists_sequence() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 0. Initialize window"))
        .stdout(predicate::str::contains("15. Create semaphores"));
    Ok(())
}

#[test]
fn cli_quiet_hides_steps() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .args(["run", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Create swapchain").not());
    Ok(())
}

#[test]
fn cli_debug_logs_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    stagehand(&temp)
        .args(["--debug", "steps"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Stagehand starting"));
    Ok(())
}

#[test]
fn cli_invalid_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagehand"));
    cmd.arg("invalid-command-xyz");
    cmd.assert().failure();
    Ok(())
}
