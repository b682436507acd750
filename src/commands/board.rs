//! Kanban board.

use super::{Created, Describe, Mutation, Output, choose_id, json_string, now_timestamp};
use crate::models::{KanbanBoard, KanbanTask, TaskStatus};
use crate::storage::Storage;
use crate::Result;
use serde::Serialize;

const NOUN: &str = "task";

impl Describe for KanbanTask {
    fn describe(&self) -> String {
        let mut line = format!("[{}] {} ({})", self.id, self.title, self.status);
        if !self.description.is_empty() {
            line.push_str(&format!(" - {}", self.description));
        }
        line
    }
}

/// The whole board.
#[derive(Debug, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: KanbanBoard,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Output for BoardView {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(warning) = &self.warning {
            lines.push(format!("Warning: {}", warning));
        }
        for status in TaskStatus::ALL {
            let column = self.board.column(status);
            lines.push(format!("{} ({}):", status, column.len()));
            for task in column {
                lines.push(format!("  [{}] {}", task.id, task.title));
            }
        }
        lines.join("\n")
    }
}

/// Outcome of `board move`.
#[derive(Debug, Serialize)]
pub struct TaskMoved {
    pub id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// False when `from` holds no task with this id
    pub moved: bool,
}

impl Output for TaskMoved {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.moved {
            format!("Moved task {} from {} to {}", self.id, self.from, self.to)
        } else {
            format!("No task {} in {} (nothing changed)", self.id, self.from)
        }
    }
}

pub fn board_show(storage: &Storage) -> Result<BoardView> {
    let (board, warning) = storage.board().load_or_default().into_parts();
    Ok(BoardView {
        total: board.len(),
        board,
        warning: warning.map(|e| e.to_string()),
    })
}

pub fn board_add(
    storage: &Storage,
    title: &str,
    description: Option<String>,
    status: &str,
    id: Option<String>,
) -> Result<Created<KanbanTask>> {
    let record = KanbanTask {
        id: choose_id(id, "task", title),
        title: title.to_string(),
        description: description.unwrap_or_default(),
        status: TaskStatus::parse(status)?,
        created_at: now_timestamp(),
    };
    storage.board().add_task(record.clone())?;
    Ok(Created { record })
}

pub fn board_move(storage: &Storage, id: &str, from: &str, to: &str) -> Result<TaskMoved> {
    let from = TaskStatus::parse(from)?;
    let to = TaskStatus::parse(to)?;
    let moved = storage.board().move_task(id, from, to)?;
    Ok(TaskMoved {
        id: id.to_string(),
        from,
        to,
        moved,
    })
}

/// Edit a task in the column named by `status`.
pub fn board_update(
    storage: &Storage,
    id: &str,
    status: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<Mutation> {
    let status = TaskStatus::parse(status)?;
    let store = storage.board();
    let board = store.load()?;
    let Some(mut task) = board.column(status).iter().find(|t| t.id == id).cloned() else {
        return Ok(Mutation::new(NOUN, "updated", id, false));
    };

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = description {
        task.description = description;
    }

    let changed = store.update_task(task, status)?;
    Ok(Mutation::new(NOUN, "updated", id, changed))
}

pub fn board_delete(storage: &Storage, id: &str, status: &str) -> Result<Mutation> {
    let status = TaskStatus::parse(status)?;
    let changed = storage.board().delete_task(id, status)?;
    Ok(Mutation::new(NOUN, "deleted", id, changed))
}
