//! Smoke tests for the organizer CLI.
//!
//! These tests verify basic CLI functionality:
//! - `org --version` outputs version info
//! - `org --help` outputs help text
//! - errors are reported as JSON on stderr with exit code 1

mod common;

use assert_cmd::Command;
use common::TestEnv;
use predicates::prelude::*;

fn org() -> Command {
    Command::new(env!("CARGO_BIN_EXE_org"))
}

#[test]
fn test_version_flag() {
    org()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("org"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    org()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("canvas"));
}

#[test]
fn test_step_help() {
    org()
        .args(["step", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("move"))
        .stdout(predicate::str::contains("toggle"));
}

#[test]
fn test_missing_subcommand_fails() {
    org().assert().failure();
}

#[test]
fn test_invalid_command() {
    org()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_first_run_creates_layout() {
    let env = TestEnv::new();

    env.org().args(["link", "list"]).assert().success();

    assert!(env.image_path().is_dir());
    assert!(env.backup_path().is_dir());
    // init/ appears with the first saved document
    assert!(!env.init_path().exists());
}

#[test]
fn test_command_error_is_json_on_stderr() {
    let env = TestEnv::new();

    env.org()
        .args(["backup", "restore", "../../etc"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with(r#"{"error":"#))
        .stderr(predicate::str::contains("path separators"));
}

#[test]
fn test_command_error_human() {
    let env = TestEnv::new();

    env.org()
        .args(["-H", "backup", "restore", "backup_2024-01-01_00-00-00"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: Not found"));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let env = TestEnv::new();
    let other = common::TempDir::new().unwrap();

    env.org()
        .arg("--data-dir")
        .arg(other.path())
        .args(["step", "add", "Elsewhere"])
        .assert()
        .success();

    assert!(other.path().join("init").join("passos_data.json").exists());
    assert!(!env.init_path().join("passos_data.json").exists());
}
