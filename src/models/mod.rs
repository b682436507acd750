//! Data models for organizer entities.
//!
//! This module defines the record types persisted as JSON collections:
//! - `LinkRecord` - Saved links
//! - `CalendarEvent` - Dated calendar entries
//! - `Goal` - Goals with a progress percentage
//! - `Step` - Ordered checklist steps
//! - `KanbanTask` - Tasks living in one of the board columns
//!
//! The kanban board and the ideas canvas have their own submodules.

pub mod board;
pub mod canvas;

pub use board::KanbanBoard;
pub use canvas::{CanvasDocument, CanvasEdge, CanvasNode, Position};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deserialize a list that may be `null` on disk as an empty list.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a status tag, reading anything unrecognised as the default.
/// The board rewrites every tag from its column after decoding.
fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| TaskStatus::parse(s).ok())
        .unwrap_or_default())
}

/// A record stored in a collection, addressable by its caller-supplied id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Unique identifier within the collection.
    fn id(&self) -> &str;
}

/// A saved link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

/// A calendar entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Day of the event, `YYYY-MM-DD`
    pub date: String,
    /// Time of day, `HH:MM`
    pub time: String,
    pub description: String,
    /// Display color (hex)
    pub color: String,
    pub created_at: String,
}

/// A goal with a completion percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub deadline: String,
    /// Completion percentage (0-100)
    pub progress: f64,
    pub done: bool,
    pub created_at: String,
}

/// One entry of the ordered step list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub description: String,
    pub done: bool,
    /// 1-based position, dense across the collection at rest
    pub order: u32,
    pub created_at: String,
}

/// A task on the kanban board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KanbanTask {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Name of the column this task is stored in
    #[serde(deserialize_with = "lenient_status")]
    pub status: TaskStatus,
    pub created_at: String,
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record!(LinkRecord, CalendarEvent, Goal, Step, KanbanTask);

/// Kanban column a task belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Objective,
    Doing,
    Done,
}

impl TaskStatus {
    /// All columns in board order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Objective, TaskStatus::Doing, TaskStatus::Done];

    /// Position of this column in [`TaskStatus::ALL`].
    pub fn index(self) -> usize {
        match self {
            TaskStatus::Objective => 0,
            TaskStatus::Doing => 1,
            TaskStatus::Done => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Objective => "objective",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }

    /// Parse a column name, case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "objective" => Ok(TaskStatus::Objective),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            _ => Err(Error::InvalidInput(format!(
                "Invalid status: {} (expected objective, doing or done)",
                s
            ))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for moving a step within the ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(Error::InvalidInput(format!(
                "Invalid direction: {} (expected up or down)",
                s
            ))),
        }
    }
}
