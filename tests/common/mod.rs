//! Common test utilities for organizer integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real data or config directories.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `data_dir`: the data root (via `ORG_DATA_DIR`)
/// - `config_dir`: the system config directory (via `ORG_CONFIG_DIR`)
///
/// The `org()` method returns a `Command` that sets both per-invocation,
/// making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Command for the org binary with the startup snapshot disabled.
    pub fn org(&self) -> Command {
        let mut cmd = self.org_with_auto_backup();
        cmd.arg("--no-auto-backup");
        cmd
    }

    /// Command for the org binary that takes the startup snapshot.
    pub fn org_with_auto_backup(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_org"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("ORG_DATA_DIR", self.data_dir.path());
        cmd.env("ORG_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("ORG_LOG");
        cmd.env_remove("ORG_LOG_FORMAT");
        cmd
    }

    /// Run an org command that must succeed and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.org().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    pub fn init_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("init")
    }

    pub fn image_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("img")
    }

    pub fn backup_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("backups")
    }

    /// Read a module document from init/ as JSON.
    pub fn read_document(&self, name: &str) -> serde_json::Value {
        let bytes = std::fs::read(self.init_path().join(name)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Write a raw module document into init/.
    pub fn write_document(&self, name: &str, contents: &str) {
        std::fs::create_dir_all(self.init_path()).unwrap();
        std::fs::write(self.init_path().join(name), contents).unwrap();
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
