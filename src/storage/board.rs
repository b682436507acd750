//! Kanban board store.

use super::collection::{JsonDocument, Loaded};
use crate::Result;
use crate::models::{KanbanBoard, KanbanTask, TaskStatus};
use std::path::{Path, PathBuf};

/// Store for the three-column kanban board.
#[derive(Debug, Clone)]
pub struct BoardStore {
    doc: JsonDocument<KanbanBoard>,
}

impl BoardStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            doc: JsonDocument::new(dir, file_name),
        }
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    /// Load the board. Missing columns (or a missing file) are empty.
    pub fn load(&self) -> Result<KanbanBoard> {
        self.doc.load()
    }

    pub fn load_or_default(&self) -> Loaded<KanbanBoard> {
        self.doc.load_or_default()
    }

    /// Replace the whole board.
    pub fn save(&self, board: &KanbanBoard) -> Result<()> {
        self.doc.save(board)
    }

    /// Append a task to the column named by its status.
    pub fn add_task(&self, task: KanbanTask) -> Result<()> {
        let mut board = self.load()?;
        board.push(task);
        self.save(&board)
    }

    /// Move a task between columns.
    ///
    /// Returns `false` without touching the file when `from` has no task with `id`.
    pub fn move_task(&self, id: &str, from: TaskStatus, to: TaskStatus) -> Result<bool> {
        let mut board = self.load()?;
        if !board.move_task(id, from, to) {
            return Ok(false);
        }
        self.save(&board)?;
        Ok(true)
    }

    /// Delete a task from the column named by `status`.
    pub fn delete_task(&self, id: &str, status: TaskStatus) -> Result<bool> {
        let mut board = self.load()?;
        if !board.remove(id, status) {
            return Ok(false);
        }
        self.save(&board)?;
        Ok(true)
    }

    /// Replace a task within the column named by `status`.
    pub fn update_task(&self, task: KanbanTask, status: TaskStatus) -> Result<bool> {
        let mut board = self.load()?;
        if !board.replace(task, status) {
            return Ok(false);
        }
        self.save(&board)?;
        Ok(true)
    }
}
