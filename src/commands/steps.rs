//! Ordered steps.

use super::{Created, Describe, Listed, Mutation, Output, choose_id, json_string, now_timestamp};
use crate::Result;
use crate::models::{Direction, Step};
use crate::storage::Storage;
use serde::Serialize;

const NOUN: &str = "step";

impl Describe for Step {
    fn describe(&self) -> String {
        let check = if self.done { "x" } else { " " };
        format!("{}. [{}] {} ({})", self.order, check, self.description, self.id)
    }
}

/// Outcome of `step move`.
#[derive(Debug, Serialize)]
pub struct StepMoved {
    pub id: String,
    pub direction: &'static str,
    /// False for an unknown id or a step already at that end of the list
    pub moved: bool,
}

impl Output for StepMoved {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.moved {
            format!("Moved step {} {}", self.id, self.direction)
        } else {
            format!("Step {} not moved", self.id)
        }
    }
}

/// Outcome of `step toggle`.
#[derive(Debug, Serialize)]
pub struct StepToggled {
    pub id: String,
    /// New completion state, absent for an unknown id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    pub changed: bool,
}

impl Output for StepToggled {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match self.done {
            Some(true) => format!("Step {} done", self.id),
            Some(false) => format!("Step {} reopened", self.id),
            None => format!("No step with id {} (nothing changed)", self.id),
        }
    }
}

/// Append a step at the end of the list.
pub fn step_add(storage: &Storage, description: &str, id: Option<String>) -> Result<Created<Step>> {
    let step = Step {
        id: choose_id(id, "step", description),
        description: description.to_string(),
        done: false,
        order: 0,
        created_at: now_timestamp(),
    };
    let record = storage.steps().add(step)?;
    Ok(Created { record })
}

pub fn step_list(storage: &Storage) -> Result<Listed<Step>> {
    let mut listed = Listed::from_loaded(NOUN, storage.steps().load_or_default());
    listed.items.sort_by_key(|s| s.order);
    Ok(listed)
}

pub fn step_update(storage: &Storage, id: &str, description: &str) -> Result<Mutation> {
    let steps = storage.steps();
    let Some(mut step) = steps.load()?.into_iter().find(|s| s.id == id) else {
        return Ok(Mutation::new(NOUN, "updated", id, false));
    };
    step.description = description.to_string();

    let changed = steps.update(step)?;
    Ok(Mutation::new(NOUN, "updated", id, changed))
}

pub fn step_delete(storage: &Storage, id: &str) -> Result<Mutation> {
    let changed = storage.steps().delete(id)?;
    Ok(Mutation::new(NOUN, "deleted", id, changed))
}

/// Swap a step with its neighbour. `direction` is "up" or "down".
pub fn step_move(storage: &Storage, id: &str, direction: &str) -> Result<StepMoved> {
    let parsed = Direction::parse(direction)?;
    let moved = storage.steps().move_step(id, parsed)?;
    Ok(StepMoved {
        id: id.to_string(),
        direction: match parsed {
            Direction::Up => "up",
            Direction::Down => "down",
        },
        moved,
    })
}

pub fn step_toggle(storage: &Storage, id: &str) -> Result<StepToggled> {
    let done = storage.steps().toggle_done(id)?;
    Ok(StepToggled {
        id: id.to_string(),
        done,
        changed: done.is_some(),
    })
}
