//! Saved links.

use super::{Created, Describe, Listed, Mutation, choose_id, now_timestamp};
use crate::models::LinkRecord;
use crate::storage::Storage;
use crate::{Error, Result};

const NOUN: &str = "link";

impl Describe for LinkRecord {
    fn describe(&self) -> String {
        let mut line = format!("[{}] {} <{}>", self.id, self.title, self.url);
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(" - {}", description));
        }
        line
    }
}

/// Store a new link.
pub fn link_add(
    storage: &Storage,
    title: &str,
    url: &str,
    description: Option<String>,
    id: Option<String>,
) -> Result<Created<LinkRecord>> {
    if url.trim().is_empty() {
        return Err(Error::InvalidInput("url must not be empty".to_string()));
    }

    let record = LinkRecord {
        id: choose_id(id, "lnk", url),
        title: title.to_string(),
        url: url.to_string(),
        description,
        created_at: now_timestamp(),
    };
    storage.links().add(record.clone())?;
    Ok(Created { record })
}

pub fn link_list(storage: &Storage) -> Result<Listed<LinkRecord>> {
    Ok(Listed::from_loaded(NOUN, storage.links().load_or_default()))
}

/// Change the given fields of a link. Unknown ids change nothing.
pub fn link_update(
    storage: &Storage,
    id: &str,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
) -> Result<Mutation> {
    let links = storage.links();
    let Some(mut record) = links.get(id)? else {
        return Ok(Mutation::new(NOUN, "updated", id, false));
    };

    if let Some(title) = title {
        record.title = title;
    }
    if let Some(url) = url {
        record.url = url;
    }
    if let Some(description) = description {
        record.description = Some(description);
    }

    let changed = links.update(record)?;
    Ok(Mutation::new(NOUN, "updated", id, changed))
}

pub fn link_delete(storage: &Storage, id: &str) -> Result<Mutation> {
    let changed = storage.links().delete(id)?;
    Ok(Mutation::new(NOUN, "deleted", id, changed))
}
