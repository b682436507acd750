//! Command implementations for the `org` CLI.
//!
//! Each command runs one store operation and returns a value implementing
//! [`Output`]. Commands are organized by module:
//! - `links`, `events`, `goals` - record collections
//! - `steps` - ordered step list
//! - `board` - kanban board
//! - `canvas` - ideas canvas and its images
//! - `backup` - snapshots
//! - `config` - configuration

mod backup;
mod board;
mod canvas;
mod config;
mod events;
mod goals;
mod links;
mod steps;

pub use backup::*;
pub use board::*;
pub use canvas::*;
pub use config::*;
pub use events::*;
pub use goals::*;
pub use links::*;
pub use steps::*;

use crate::storage::Loaded;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// One-line human rendering of a stored value.
pub trait Describe {
    fn describe(&self) -> String;
}

fn json_string<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Current time as stamped into `createdAt`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Caller-supplied id, or a generated `<prefix>-<hex>` one.
fn choose_id(id: Option<String>, prefix: &str, seed: &str) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => crate::storage::generate_id(prefix, seed),
    }
}

fn validate_date(value: &str, field: &str) -> Result<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| Error::InvalidInput(format!("{} must be YYYY-MM-DD, got {:?}", field, value)))
}

fn validate_time(value: &str) -> Result<()> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| Error::InvalidInput(format!("time must be HH:MM, got {:?}", value)))
}

/// A newly stored record.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Created<T> {
    pub record: T,
}

impl<T: Serialize + Describe> Output for Created<T> {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Created {}", self.record.describe())
    }
}

/// Every record of a collection.
#[derive(Debug, Serialize)]
pub struct Listed<T> {
    pub count: usize,
    pub items: Vec<T>,
    /// Why the stored document could not be read, when it was replaced by an empty default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    noun: &'static str,
}

impl<T> Listed<T> {
    pub fn new(noun: &'static str, items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
            warning: None,
            noun,
        }
    }

    /// Build from a lenient load, keeping its warning.
    pub fn from_loaded(noun: &'static str, loaded: Loaded<Vec<T>>) -> Self {
        let (items, warning) = loaded.into_parts();
        let mut listed = Self::new(noun, items);
        listed.warning = warning.map(|e| e.to_string());
        listed
    }

    fn retain(mut self, keep: impl FnMut(&T) -> bool) -> Self {
        self.items.retain(keep);
        self.count = self.items.len();
        self
    }
}

impl<T: Serialize + Describe> Output for Listed<T> {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(warning) = &self.warning {
            lines.push(format!("Warning: {}", warning));
        }
        if self.items.is_empty() {
            lines.push(format!("No {}s.", self.noun));
        } else {
            lines.push(format!(
                "{} {}{}:",
                self.count,
                self.noun,
                if self.count == 1 { "" } else { "s" }
            ));
            for item in &self.items {
                lines.push(format!("  {}", item.describe()));
            }
        }
        lines.join("\n")
    }
}

/// Outcome of an update or delete addressed by id.
#[derive(Debug, Serialize)]
pub struct Mutation {
    pub id: String,
    pub action: &'static str,
    /// False when no record with `id` existed; nothing was written
    pub changed: bool,
    #[serde(skip)]
    noun: &'static str,
}

impl Mutation {
    pub fn new(noun: &'static str, action: &'static str, id: &str, changed: bool) -> Self {
        Self {
            id: id.to_string(),
            action,
            changed,
            noun,
        }
    }
}

impl Output for Mutation {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.changed {
            let mut verb = self.action.to_string();
            if let Some(first) = verb.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            format!("{} {} {}", verb, self.noun, self.id)
        } else {
            format!("No {} with id {} (nothing changed)", self.noun, self.id)
        }
    }
}
