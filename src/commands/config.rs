//! Configuration commands.

use super::{Output, json_string};
use crate::config::{
    ConfigOverrides, ResolvedConfig, load_config, read_config_file, session_config_path,
    system_config_path, write_config_file,
};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Resolved configuration plus the files it was read from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigShow {
    pub config: ResolvedConfig,
    pub session_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<String>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = vec![
            format!(
                "backup-retention = {} ({})",
                c.backup_retention.value, c.backup_retention.source
            ),
            format!("auto-backup = {} ({})", c.auto_backup.value, c.auto_backup.source),
            format!(
                "output-format = {} ({})",
                c.output_format.value, c.output_format.source
            ),
            format!("action-log = {} ({})", c.action_log.value, c.action_log.source),
            format!("session config: {}", self.session_path),
        ];
        if let Some(system) = &self.system_path {
            lines.push(format!("system config: {}", system));
        }
        lines.join("\n")
    }
}

/// Outcome of `config set`.
#[derive(Debug, Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub path: String,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path)
    }
}

pub fn config_show(data_root: &Path, overrides: &ConfigOverrides) -> Result<ConfigShow> {
    Ok(ConfigShow {
        config: load_config(data_root, overrides)?,
        session_path: session_config_path(data_root).display().to_string(),
        system_path: system_config_path().map(|p| p.display().to_string()),
    })
}

/// Validate and store one key in the data root's config.kdl.
pub fn config_set(data_root: &Path, key: &str, value: &str) -> Result<ConfigSet> {
    let path = session_config_path(data_root);
    let mut config = read_config_file(&path)?;
    config.set(key, value).map_err(Error::InvalidInput)?;
    write_config_file(&path, &config)?;

    Ok(ConfigSet {
        key: key.to_string(),
        value: value.to_string(),
        path: path.display().to_string(),
    })
}
