//! Kanban board model.
//!
//! The board keeps its three columns in one array indexed by [`TaskStatus`].
//! Every mutation that changes a task's column also rewrites the task's
//! `status` tag, so the tag always names the column the task is stored in.
//!
//! On disk the board is the object `{"objective": [...], "doing": [...], "done": [...]}`.
//! Missing keys decode to empty columns.

use super::{KanbanTask, TaskStatus};
use serde::{Deserialize, Serialize};

/// Three ordered task columns keyed by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoardDocument", into = "BoardDocument")]
pub struct KanbanBoard {
    columns: [Vec<KanbanTask>; 3],
}

/// Serialized shape of the board.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct BoardDocument {
    #[serde(deserialize_with = "super::nullable_vec")]
    objective: Vec<KanbanTask>,
    #[serde(deserialize_with = "super::nullable_vec")]
    doing: Vec<KanbanTask>,
    #[serde(deserialize_with = "super::nullable_vec")]
    done: Vec<KanbanTask>,
}

impl From<BoardDocument> for KanbanBoard {
    fn from(doc: BoardDocument) -> Self {
        let mut board = KanbanBoard {
            columns: [doc.objective, doc.doing, doc.done],
        };
        // A tag that disagrees with its column is rewritten to the column name.
        for status in TaskStatus::ALL {
            for task in &mut board.columns[status.index()] {
                task.status = status;
            }
        }
        board
    }
}

impl From<KanbanBoard> for BoardDocument {
    fn from(board: KanbanBoard) -> Self {
        let [objective, doing, done] = board.columns;
        BoardDocument {
            objective,
            doing,
            done,
        }
    }
}

impl KanbanBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in the given column, in order.
    pub fn column(&self, status: TaskStatus) -> &[KanbanTask] {
        &self.columns[status.index()]
    }

    /// Total number of tasks across all columns.
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a task to the column named by its `status`.
    pub fn push(&mut self, task: KanbanTask) {
        self.columns[task.status.index()].push(task);
    }

    /// Move the first task with `id` in column `from` to the end of column `to`.
    ///
    /// Returns `false` and leaves the board untouched when `from` has no such task.
    pub fn move_task(&mut self, id: &str, from: TaskStatus, to: TaskStatus) -> bool {
        let source = &mut self.columns[from.index()];
        let Some(pos) = source.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut task = source.remove(pos);
        task.status = to;
        self.columns[to.index()].push(task);
        true
    }

    /// Remove every task with `id` from column `status`.
    pub fn remove(&mut self, id: &str, status: TaskStatus) -> bool {
        let column = &mut self.columns[status.index()];
        let before = column.len();
        column.retain(|t| t.id != id);
        column.len() != before
    }

    /// Replace the first task with the same id in column `status`.
    ///
    /// The stored task keeps `status` as its tag regardless of what `task` carries.
    pub fn replace(&mut self, mut task: KanbanTask, status: TaskStatus) -> bool {
        let column = &mut self.columns[status.index()];
        match column.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                task.status = status;
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Locate a task by id anywhere on the board.
    pub fn find(&self, id: &str) -> Option<&KanbanTask> {
        self.columns.iter().flatten().find(|t| t.id == id)
    }
}
