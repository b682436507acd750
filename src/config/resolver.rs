//! Precedence resolution for configuration.
//!
//! ## Config Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Session config.kdl (`<data root>/config.kdl`)
//! 3. System config.kdl (`~/.config/organizer/config.kdl`)
//! 4. Built-in defaults

use super::schema::{OrganizerConfig, OutputFormat};
use super::{read_config_file, session_config_path, system_config_path};
use crate::Result;
use crate::backup::MAX_BACKUPS;
use serde::Serialize;
use std::path::Path;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from the data root's config.kdl
    Session,
    /// Value from the user-wide config.kdl
    System,
    /// Built-in default value
    Default,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::CliFlag => "cli",
            ValueSource::Session => "session",
            ValueSource::System => "system",
            ValueSource::Default => "default",
        }
    }
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedConfig {
    pub backup_retention: Resolved<u32>,
    pub auto_backup: Resolved<bool>,
    pub output_format: Resolved<OutputFormat>,
    pub action_log: Resolved<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            backup_retention: Resolved::new(MAX_BACKUPS as u32, ValueSource::Default),
            auto_backup: Resolved::new(true, ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            action_log: Resolved::new(true, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn backup_retention(&self) -> usize {
        self.backup_retention.value as usize
    }

    pub fn auto_backup(&self) -> bool {
        self.auto_backup.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn action_log(&self) -> bool {
        self.action_log.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output format override from `--human`
    pub output_format: Option<OutputFormat>,
    /// Startup snapshot override from `--no-auto-backup`
    pub auto_backup: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_auto_backup(mut self, enabled: bool) -> Self {
        self.auto_backup = Some(enabled);
        self
    }
}

fn pick<T: Copy>(
    cli: Option<T>,
    session: Option<T>,
    system: Option<T>,
    default: Resolved<T>,
) -> Resolved<T> {
    if let Some(value) = cli {
        Resolved::new(value, ValueSource::CliFlag)
    } else if let Some(value) = session {
        Resolved::new(value, ValueSource::Session)
    } else if let Some(value) = system {
        Resolved::new(value, ValueSource::System)
    } else {
        default
    }
}

/// Resolve already-loaded configs with full precedence chain.
pub fn resolve_config(
    system: &OrganizerConfig,
    session: &OrganizerConfig,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    ResolvedConfig {
        backup_retention: pick(
            None,
            session.backup_retention,
            system.backup_retention,
            defaults.backup_retention,
        ),
        auto_backup: pick(
            overrides.auto_backup,
            session.auto_backup,
            system.auto_backup,
            defaults.auto_backup,
        ),
        output_format: pick(
            overrides.output_format,
            session.output_format,
            system.output_format,
            defaults.output_format,
        ),
        action_log: pick(
            None,
            session.action_log,
            system.action_log,
            defaults.action_log,
        ),
    }
}

/// Load the system and data-root config files and resolve them.
pub fn load_config(root: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system = match system_config_path() {
        Some(path) => read_config_file(&path)?,
        None => OrganizerConfig::default(),
    };
    let session = read_config_file(&session_config_path(root))?;
    Ok(resolve_config(&system, &session, overrides))
}
