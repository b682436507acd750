//! Configuration for the organizer.
//!
//! ## config.kdl
//!
//! Located at:
//! - System: `~/.config/organizer/config.kdl` (or `$ORG_CONFIG_DIR/config.kdl`)
//! - Session: `<data root>/config.kdl`
//!
//! Contains:
//! - `backup-retention` - Snapshots kept (1-1000)
//! - `auto-backup` - Snapshot once at startup
//! - `output-format` - "json" or "human"
//! - `action-log` - Record invocations in `<data root>/action.log`
//!
//! ## Precedence
//!
//! CLI flag > session config > system config > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, load_config, resolve_config,
};
pub use schema::{CONFIG_KEYS, OrganizerConfig, OutputFormat};
#[cfg(unix)]
pub use schema::CONFIG_FILE_MODE;

use crate::storage::atomic::write_atomic;
use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "ORG_CONFIG_DIR";

/// File name of the configuration document.
pub const CONFIG_FILE: &str = "config.kdl";

/// Path of the user-wide config.kdl, if a config directory can be determined.
pub fn system_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join(CONFIG_FILE));
        }
    }
    dirs::config_dir().map(|dir| dir.join("organizer").join(CONFIG_FILE))
}

/// Path of the data root's config.kdl.
pub fn session_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Read a config file. A missing file is an empty config.
pub fn read_config_file(path: &Path) -> Result<OrganizerConfig> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(OrganizerConfig::default()),
        Err(e) => return Err(e.into()),
    };

    let doc: KdlDocument = text
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    Ok(OrganizerConfig::from_kdl(&doc))
}

/// Validate and write a config file atomically.
pub fn write_config_file(path: &Path, config: &OrganizerConfig) -> Result<()> {
    config.validate().map_err(Error::Config)?;

    let mut doc = config.to_kdl();
    doc.autoformat();
    write_atomic(path, doc.to_string().as_bytes())?;
    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_config_is_empty() {
        let temp = TempDir::new().unwrap();
        let config = read_config_file(&temp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, OrganizerConfig::default());
    }

    #[test]
    fn test_read_invalid_kdl_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "backup-retention {{{").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = session_config_path(temp.path());
        let config = OrganizerConfig {
            backup_retention: Some(4),
            auto_backup: Some(false),
            ..Default::default()
        };

        write_config_file(&path, &config).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("backup-retention 4"));
        assert!(text.contains("auto-backup #false"));
        assert_eq!(read_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_write_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        let path = session_config_path(temp.path());
        let config = OrganizerConfig {
            backup_retention: Some(0),
            ..Default::default()
        };

        assert!(write_config_file(&path, &config).is_err());
        assert!(!path.exists());
    }
}
