//! Snapshot backups of the live module documents.
//!
//! Layout under the data root:
//! `backups/backup_<YYYY-MM-DD_HH-MM-SS>/<module>_data.json`
//!
//! The timestamp format is fixed-width and zero-padded, so snapshot names
//! sort chronologically as plain strings.

use crate::storage::atomic::copy_file;
use crate::storage::{is_data_file_name, validate_file_name};
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default number of snapshots kept.
pub const MAX_BACKUPS: usize = 10;

/// Directory-name prefix identifying a snapshot.
pub const BACKUP_PREFIX: &str = "backup_";

/// strftime format of the snapshot name suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// strftime format of the human-readable label.
const LABEL_FORMAT: &str = "%d/%m/%Y at %H:%M:%S";

/// One snapshot directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    /// Directory name, e.g. `backup_2024-01-01_09-30-00`
    pub name: String,
    /// Raw timestamp suffix of the name
    pub timestamp: String,
    /// Timestamp rendered for people; the raw timestamp if it does not parse
    pub label: String,
}

impl BackupSnapshot {
    /// Build from a directory name, or `None` if it is not a snapshot name.
    pub fn from_name(name: &str) -> Option<Self> {
        let timestamp = name.strip_prefix(BACKUP_PREFIX)?;
        let label = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map(|dt| dt.format(LABEL_FORMAT).to_string())
            .unwrap_or_else(|_| timestamp.to_string());
        Some(Self {
            name: name.to_string(),
            timestamp: timestamp.to_string(),
            label,
        })
    }

    fn at(time: NaiveDateTime) -> Self {
        Self {
            name: format!("{}{}", BACKUP_PREFIX, time.format(TIMESTAMP_FORMAT)),
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            label: time.format(LABEL_FORMAT).to_string(),
        }
    }
}

/// Creates, lists, restores and evicts snapshots for one data root.
#[derive(Debug, Clone)]
pub struct BackupManager {
    root: PathBuf,
    init_dir: PathBuf,
    backup_dir: PathBuf,
    retention: usize,
    /// Snapshot retention never evicts
    pinned: Option<String>,
}

impl BackupManager {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            init_dir: root.join("init"),
            backup_dir: root.join("backups"),
            retention: MAX_BACKUPS,
            pinned: None,
        }
    }

    /// Override the retention cap. Values below 1 are treated as 1.
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    /// Keep snapshot `name` through retention, e.g. while it is being restored.
    /// It still counts toward the cap, so an older snapshot goes in its place.
    pub fn pinning(mut self, name: impl Into<String>) -> Self {
        self.pinned = Some(name.into());
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// The automatic snapshot taken once at process start.
    ///
    /// Never fails: every error is logged and discarded.
    pub fn startup(&self) -> Option<BackupSnapshot> {
        if let Err(e) = fs::create_dir_all(&self.backup_dir) {
            tracing::warn!(dir = %self.backup_dir.display(), error = %e, "could not create backup directory");
        }
        match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(Error::EmptyBackup) => {
                tracing::debug!("startup backup skipped, no documents yet");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "startup backup skipped");
                None
            }
        }
    }

    /// Snapshot the live documents now.
    ///
    /// Returns `Ok(None)` when the live directory does not exist yet.
    pub fn snapshot(&self) -> Result<Option<BackupSnapshot>> {
        self.snapshot_at(Local::now().naive_local())
    }

    /// Snapshot the live documents under the name for `time`.
    ///
    /// A second snapshot within the same second reuses that directory.
    pub fn snapshot_at(&self, time: NaiveDateTime) -> Result<Option<BackupSnapshot>> {
        let entries = match fs::read_dir(&self.init_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %self.init_dir.display(), "nothing to back up yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = BackupSnapshot::at(time);
        let target = self.backup_dir.join(&snapshot.name);
        fs::create_dir_all(&self.backup_dir)?;
        let created = match fs::create_dir(&target) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => false,
            Err(e) => return Err(e.into()),
        };

        let mut copied = 0usize;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_data_file_name(name) || !entry.path().is_file() {
                continue;
            }
            match copy_file(&entry.path(), &target.join(name)) {
                Ok(_) => copied += 1,
                Err(e) => tracing::warn!(file = name, error = %e, "could not copy into snapshot"),
            }
        }

        if copied == 0 {
            if created {
                let _ = fs::remove_dir_all(&target);
            }
            return Err(Error::EmptyBackup);
        }

        tracing::info!(backup = %snapshot.name, files = copied, "snapshot created");
        self.enforce_retention();
        Ok(Some(snapshot))
    }

    /// All snapshots, most recent first. Creates the backup directory if absent.
    pub fn list(&self) -> Result<Vec<BackupSnapshot>> {
        fs::create_dir_all(&self.backup_dir)?;
        let mut names = self.snapshot_names()?;
        names.sort_by(|a, b| b.cmp(a));
        Ok(names
            .iter()
            .filter_map(|n| BackupSnapshot::from_name(n))
            .collect())
    }

    /// Replace live documents with the ones stored in snapshot `name`.
    ///
    /// Every `*_data.json` file is first copied into a staging directory next
    /// to `init/`; the live files are only replaced once all copies succeeded.
    /// Live documents absent from the snapshot are left untouched.
    /// Returns the restored file names, sorted.
    pub fn restore(&self, name: &str) -> Result<Vec<String>> {
        validate_file_name(name, "backup name")?;

        let source = self.backup_dir.join(name);
        match fs::metadata(&source) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(Error::NotFound(format!(
                    "backup {} is not a directory",
                    name
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("backup {}", name)));
            }
            Err(e) => return Err(e.into()),
        }

        fs::create_dir_all(&self.init_dir)?;
        let staging = tempfile::Builder::new()
            .prefix(".restore-")
            .tempdir_in(&self.root)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(&source)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !is_data_file_name(file_name) || !entry.file_type()?.is_file() {
                continue;
            }
            copy_file(&entry.path(), &staging.path().join(file_name))?;
            files.push(file_name.to_string());
        }
        files.sort();

        for file_name in &files {
            fs::rename(
                staging.path().join(file_name),
                self.init_dir.join(file_name),
            )?;
        }

        tracing::info!(backup = name, files = files.len(), "snapshot restored");
        Ok(files)
    }

    /// Delete the oldest snapshots beyond the retention cap.
    ///
    /// Best effort: failures are logged and skipped. Returns the names removed.
    pub fn enforce_retention(&self) -> Vec<String> {
        let mut names = match self.snapshot_names() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "could not list snapshots for retention");
                return Vec::new();
            }
        };
        names.sort();

        let excess = names.len().saturating_sub(self.retention);
        let mut removed = Vec::new();
        let evictable = names
            .into_iter()
            .filter(|n| self.pinned.as_deref() != Some(n.as_str()));
        for name in evictable.take(excess) {
            match fs::remove_dir_all(self.backup_dir.join(&name)) {
                Ok(()) => {
                    tracing::info!(backup = %name, "old snapshot evicted");
                    removed.push(name);
                }
                Err(e) => tracing::warn!(backup = %name, error = %e, "could not evict snapshot"),
            }
        }
        removed
    }

    /// Names of snapshot directories, unsorted.
    fn snapshot_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(BACKUP_PREFIX) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}
