//! Ordered step list.
//!
//! Steps carry an explicit 1-based `order`. After every structural change
//! the list is renumbered so the stored orders are exactly `1..=N` in list
//! order.

use super::collection::{JsonDocument, Loaded};
use crate::Result;
use crate::models::{Direction, Step};
use std::path::{Path, PathBuf};

/// Store for the ordered step list.
#[derive(Debug, Clone)]
pub struct StepStore {
    doc: JsonDocument<Vec<Step>>,
}

/// Rewrite `order` to match list positions.
fn renumber(steps: &mut [Step]) {
    for (i, step) in steps.iter_mut().enumerate() {
        step.order = i as u32 + 1;
    }
}

impl StepStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            doc: JsonDocument::new(dir, file_name),
        }
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn load(&self) -> Result<Vec<Step>> {
        self.doc.load()
    }

    pub fn load_or_default(&self) -> Loaded<Vec<Step>> {
        self.doc.load_or_default()
    }

    /// Replace the whole list, renumbering it in the given order.
    pub fn save(&self, mut steps: Vec<Step>) -> Result<()> {
        renumber(&mut steps);
        self.doc.save(&steps)
    }

    /// Append a step at the end of the list. Returns the stored step.
    pub fn add(&self, step: Step) -> Result<Step> {
        let mut steps = self.load()?;
        steps.push(step);
        renumber(&mut steps);
        self.doc.save(&steps)?;
        Ok(steps[steps.len() - 1].clone())
    }

    /// Replace the first step with the same id, keeping its position.
    pub fn update(&self, mut step: Step) -> Result<bool> {
        let mut steps = self.load()?;
        let Some(slot) = steps.iter_mut().find(|s| s.id == step.id) else {
            return Ok(false);
        };
        step.order = slot.order;
        *slot = step;
        renumber(&mut steps);
        self.doc.save(&steps)?;
        Ok(true)
    }

    /// Remove a step and close the gap in the ordering.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut steps = self.load()?;
        let before = steps.len();
        steps.retain(|s| s.id != id);
        if steps.len() == before {
            return Ok(false);
        }
        renumber(&mut steps);
        self.doc.save(&steps)?;
        Ok(true)
    }

    /// Swap a step with its neighbour in `direction`.
    ///
    /// Returns `false` when the id is unknown or the step is already at that end.
    pub fn move_step(&self, id: &str, direction: Direction) -> Result<bool> {
        let mut steps = self.load()?;
        let Some(idx) = steps.iter().position(|s| s.id == id) else {
            return Ok(false);
        };

        let moved = match direction {
            Direction::Up if idx > 0 => {
                steps.swap(idx, idx - 1);
                true
            }
            Direction::Down if idx + 1 < steps.len() => {
                steps.swap(idx, idx + 1);
                true
            }
            _ => false,
        };

        renumber(&mut steps);
        self.doc.save(&steps)?;
        Ok(moved)
    }

    /// Flip the completion flag. Returns the new state, or `None` for an unknown id.
    pub fn toggle_done(&self, id: &str) -> Result<Option<bool>> {
        let mut steps = self.load()?;
        let Some(step) = steps.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        step.done = !step.done;
        let done = step.done;
        renumber(&mut steps);
        self.doc.save(&steps)?;
        Ok(Some(done))
    }
}
