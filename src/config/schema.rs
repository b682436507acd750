//! KDL schema for config.kdl.
//!
//! ```kdl
//! backup-retention 10
//! auto-backup #true
//! output-format "human"  // or "json"
//! action-log #false
//! ```

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Bounds accepted for `backup-retention`.
pub const RETENTION_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

/// Every key understood in config.kdl.
pub const CONFIG_KEYS: [&str; 4] = ["backup-retention", "auto-backup", "output-format", "action-log"];

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preferences stored in config.kdl. Unset keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Number of snapshots kept before the oldest is evicted
    pub backup_retention: Option<u32>,

    /// Take a snapshot once at process start
    pub auto_backup: Option<bool>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Append every invocation to action.log
    pub action_log: Option<bool>,
}

fn first_value<'a>(doc: &'a KdlDocument, key: &str) -> Option<&'a KdlValue> {
    doc.get(key)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "#true" | "yes" | "on" | "1" => Some(true),
        "false" | "#false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}

impl OrganizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(retention) = self.backup_retention {
            if !RETENTION_RANGE.contains(&retention) {
                return Err(format!(
                    "backup-retention must be {}-{}, got {}",
                    RETENTION_RANGE.start(),
                    RETENTION_RANGE.end(),
                    retention
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Values of the wrong type or out of range are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(i) = first_value(doc, "backup-retention").and_then(|v| v.as_integer()) {
            if let Ok(n) = u32::try_from(i) {
                if RETENTION_RANGE.contains(&n) {
                    config.backup_retention = Some(n);
                }
            }
        }

        config.auto_backup = first_value(doc, "auto-backup").and_then(|v| v.as_bool());

        config.output_format = first_value(doc, "output-format")
            .and_then(|v| v.as_string())
            .and_then(OutputFormat::parse);

        config.action_log = first_value(doc, "action-log").and_then(|v| v.as_bool());

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(retention) = self.backup_retention {
            push_node(&mut doc, "backup-retention", KdlValue::Integer(retention as i128));
        }
        if let Some(enabled) = self.auto_backup {
            push_node(&mut doc, "auto-backup", KdlValue::Bool(enabled));
        }
        if let Some(format) = self.output_format {
            push_node(
                &mut doc,
                "output-format",
                KdlValue::String(format.as_str().to_string()),
            );
        }
        if let Some(enabled) = self.action_log {
            push_node(&mut doc, "action-log", KdlValue::Bool(enabled));
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &OrganizerConfig) {
        if other.backup_retention.is_some() {
            self.backup_retention = other.backup_retention;
        }
        if other.auto_backup.is_some() {
            self.auto_backup = other.auto_backup;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.action_log.is_some() {
            self.action_log = other.action_log;
        }
    }

    /// Set one key from its string form, as typed on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "backup-retention" => {
                let n: u32 = value
                    .parse()
                    .map_err(|_| format!("backup-retention must be an integer, got {:?}", value))?;
                self.backup_retention = Some(n);
            }
            "auto-backup" => {
                self.auto_backup = Some(
                    parse_bool(value)
                        .ok_or_else(|| format!("auto-backup must be true or false, got {:?}", value))?,
                );
            }
            "output-format" => {
                self.output_format = Some(OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be json or human, got {:?}", value)
                })?);
            }
            "action-log" => {
                self.action_log = Some(
                    parse_bool(value)
                        .ok_or_else(|| format!("action-log must be true or false, got {:?}", value))?,
                );
            }
            _ => {
                return Err(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

/// Required permissions for config.kdl (Unix: 0644, readable by all).
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o644;
