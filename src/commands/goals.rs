//! Goals.

use super::{Created, Describe, Listed, Mutation, choose_id, now_timestamp, validate_date};
use crate::models::Goal;
use crate::storage::Storage;
use crate::{Error, Result};

const NOUN: &str = "goal";

impl Describe for Goal {
    fn describe(&self) -> String {
        let check = if self.done { "x" } else { " " };
        let mut line = format!("[{}] [{}] {} ({}%)", self.id, check, self.title, self.progress);
        if !self.deadline.is_empty() {
            line.push_str(&format!(" due {}", self.deadline));
        }
        line
    }
}

fn validate_progress(progress: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&progress) {
        return Err(Error::InvalidInput(format!(
            "progress must be between 0 and 100, got {}",
            progress
        )));
    }
    Ok(())
}

fn validate_deadline(deadline: &str) -> Result<()> {
    if deadline.is_empty() {
        return Ok(());
    }
    validate_date(deadline, "deadline")
}

pub fn goal_add(
    storage: &Storage,
    title: &str,
    deadline: Option<String>,
    progress: Option<f64>,
    id: Option<String>,
) -> Result<Created<Goal>> {
    let deadline = deadline.unwrap_or_default();
    let progress = progress.unwrap_or(0.0);
    validate_deadline(&deadline)?;
    validate_progress(progress)?;

    let record = Goal {
        id: choose_id(id, "goal", title),
        title: title.to_string(),
        deadline,
        progress,
        done: false,
        created_at: now_timestamp(),
    };
    storage.goals().add(record.clone())?;
    Ok(Created { record })
}

pub fn goal_list(storage: &Storage) -> Result<Listed<Goal>> {
    Ok(Listed::from_loaded(NOUN, storage.goals().load_or_default()))
}

pub fn goal_update(
    storage: &Storage,
    id: &str,
    title: Option<String>,
    deadline: Option<String>,
    progress: Option<f64>,
    done: Option<bool>,
) -> Result<Mutation> {
    if let Some(deadline) = &deadline {
        validate_deadline(deadline)?;
    }
    if let Some(progress) = progress {
        validate_progress(progress)?;
    }

    let goals = storage.goals();
    let Some(mut record) = goals.get(id)? else {
        return Ok(Mutation::new(NOUN, "updated", id, false));
    };

    if let Some(title) = title {
        record.title = title;
    }
    if let Some(deadline) = deadline {
        record.deadline = deadline;
    }
    if let Some(progress) = progress {
        record.progress = progress;
    }
    if let Some(done) = done {
        record.done = done;
    }

    let changed = goals.update(record)?;
    Ok(Mutation::new(NOUN, "updated", id, changed))
}

pub fn goal_delete(storage: &Storage, id: &str) -> Result<Mutation> {
    let changed = storage.goals().delete(id)?;
    Ok(Mutation::new(NOUN, "deleted", id, changed))
}
