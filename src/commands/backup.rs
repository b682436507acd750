//! Snapshot backups.

use super::{Describe, Listed, Output, json_string};
use crate::Result;
use crate::backup::{BackupManager, BackupSnapshot};
use serde::Serialize;

impl Describe for BackupSnapshot {
    fn describe(&self) -> String {
        format!("{} ({})", self.name, self.label)
    }
}

/// Outcome of `backup create`.
#[derive(Debug, Serialize)]
pub struct BackupCreated {
    /// Absent when there was nothing to back up yet
    pub backup: Option<BackupSnapshot>,
}

impl Output for BackupCreated {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match &self.backup {
            Some(snapshot) => format!("Created backup {} ({})", snapshot.name, snapshot.label),
            None => "Nothing to back up yet.".to_string(),
        }
    }
}

/// Outcome of `backup restore`.
#[derive(Debug, Serialize)]
pub struct BackupRestored {
    pub name: String,
    pub files: Vec<String>,
}

impl Output for BackupRestored {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Restored {} file(s) from {}",
            self.files.len(),
            self.name
        )];
        lines.extend(self.files.iter().map(|f| format!("  {}", f)));
        lines.join("\n")
    }
}

/// Snapshot now. An `init/` directory without documents is [`crate::Error::EmptyBackup`].
pub fn backup_create(manager: &BackupManager) -> Result<BackupCreated> {
    Ok(BackupCreated {
        backup: manager.snapshot()?,
    })
}

pub fn backup_list(manager: &BackupManager) -> Result<Listed<BackupSnapshot>> {
    Ok(Listed::new("backup", manager.list()?))
}

pub fn backup_restore(manager: &BackupManager, name: &str) -> Result<BackupRestored> {
    let files = manager.restore(name)?;
    Ok(BackupRestored {
        name: name.to_string(),
        files,
    })
}
