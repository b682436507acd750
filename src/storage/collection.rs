//! Generic JSON document and record collection stores.
//!
//! [`JsonDocument`] implements the load-or-default / overwrite-save contract
//! for one file. [`Collection`] layers the add/update/delete pattern on top
//! for documents that are a JSON array of [`Record`]s.
//!
//! Lookups by id are first-match linear scans. An id that matches nothing
//! makes update/delete a no-op that reports `false`; the file is not rewritten.

use super::atomic::write_atomic;
use crate::models::Record;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A value loaded leniently: the default plus the error that forced it.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<Error>,
}

impl<T> Loaded<T> {
    /// Split into the value and the error, if any.
    pub fn into_parts(self) -> (T, Option<Error>) {
        (self.value, self.warning)
    }
}

/// One JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    dir: PathBuf,
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(file_name);
        Self {
            dir,
            path,
            _marker: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document.
    ///
    /// Creates the containing directory if needed. A missing file or a JSON
    /// `null` yields `T::default()`. Malformed JSON is an [`Error::Decode`].
    pub fn load(&self) -> Result<T> {
        fs::create_dir_all(&self.dir)?;

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "document absent, using default");
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_slice::<Option<T>>(&bytes).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "document loaded");
        Ok(value.unwrap_or_default())
    }

    /// Load the document, falling back to the default on any error.
    ///
    /// The error is returned alongside the default so callers can report it
    /// and still proceed.
    pub fn load_or_default(&self) -> Loaded<T> {
        match self.load() {
            Ok(value) => Loaded {
                value,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "falling back to empty document");
                Loaded {
                    value: T::default(),
                    warning: Some(e),
                }
            }
        }
    }

    /// Overwrite the document with `value`, pretty-printed.
    pub fn save(&self, value: &T) -> Result<()> {
        self.write(value)
    }

    /// Serialize any value into this document's file.
    pub(crate) fn write<S: Serialize + ?Sized>(&self, value: &S) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }
}

/// A JSON array of records persisted as one file.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    doc: JsonDocument<Vec<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            doc: JsonDocument::new(dir, file_name),
        }
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    /// Load every record. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<T>> {
        self.doc.load()
    }

    /// Load every record, or an empty list plus the error that prevented it.
    pub fn load_or_default(&self) -> Loaded<Vec<T>> {
        self.doc.load_or_default()
    }

    /// Replace the whole collection.
    pub fn save(&self, records: &[T]) -> Result<()> {
        self.doc.write(records)
    }

    /// First record with the given id.
    pub fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load()?.into_iter().find(|r| r.id() == id))
    }

    /// Append a record.
    pub fn add(&self, record: T) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    /// Replace the first record whose id matches `record`'s id.
    pub fn update(&self, record: T) -> Result<bool> {
        let mut records = self.load()?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Ok(false);
        };
        *slot = record;
        self.save(&records)?;
        Ok(true)
    }

    /// Remove every record with the given id.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarEvent, Goal, LinkRecord};
    use crate::test_utils::TestEnv;

    fn goal(id: &str, title: &str) -> Goal {
        Goal {
            id: id.to_string(),
            title: title.to_string(),
            deadline: "2024-12-31".to_string(),
            progress: 0.0,
            done: false,
            created_at: "2024-01-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let env = TestEnv::new();
        let links = env.storage().links();

        assert!(links.load().unwrap().is_empty());
        assert!(!links.path().exists());
        // Loading creates the containing directory
        assert!(env.storage().init_dir().is_dir());
    }

    #[test]
    fn test_round_trip_empty_and_non_empty() {
        let env = TestEnv::new();
        let goals = env.storage().goals();

        goals.save(&[]).unwrap();
        assert!(goals.load().unwrap().is_empty());

        let records = vec![goal("g1", "Read"), goal("g2", "Write")];
        goals.save(&records).unwrap();
        assert_eq!(goals.load().unwrap(), records);
    }

    #[test]
    fn test_saved_file_is_pretty_printed_array() {
        let env = TestEnv::new();
        let goals = env.storage().goals();
        goals.save(&[goal("g1", "Read")]).unwrap();

        let raw = std::fs::read_to_string(goals.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": \"g1\""));
        assert!(raw.contains("\"createdAt\""));
    }

    #[test]
    fn test_empty_collection_written_as_array_not_null() {
        let env = TestEnv::new();
        let events = env.storage().events();
        events.save(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(events.path()).unwrap(), "[]");
    }

    #[test]
    fn test_null_document_decodes_empty() {
        let env = TestEnv::new();
        env.write_document(crate::storage::LINKS_FILE, "null");
        assert!(env.storage().links().load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_decode_error() {
        let env = TestEnv::new();
        env.write_document(crate::storage::LINKS_FILE, "{not json");

        let err = env.storage().links().load().unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_load_or_default_reports_and_defaults() {
        let env = TestEnv::new();
        env.write_document(crate::storage::LINKS_FILE, "[{\"id\": 5");

        let (links, warning) = env.storage().links().load_or_default().into_parts();
        assert!(links.is_empty());
        assert!(matches!(warning, Some(Error::Decode { .. })));
    }

    #[test]
    fn test_mutation_refuses_to_overwrite_malformed_document() {
        let env = TestEnv::new();
        env.write_document(crate::storage::LINKS_FILE, "garbage");
        let links = env.storage().links();

        assert!(links.add(LinkRecord::default()).is_err());
        assert_eq!(std::fs::read_to_string(links.path()).unwrap(), "garbage");
    }

    #[test]
    fn test_goal_add_reload_delete_scenario() {
        let env = TestEnv::new();
        let goals = env.storage().goals();
        let input = goal("g1", "Read");

        goals.add(input.clone()).unwrap();
        assert_eq!(goals.load().unwrap(), vec![input]);

        assert!(goals.delete("g1").unwrap());
        assert!(goals.load().unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_first_match_only() {
        let env = TestEnv::new();
        let goals = env.storage().goals();
        goals
            .save(&[goal("dup", "first"), goal("dup", "second")])
            .unwrap();

        assert!(goals.update(goal("dup", "changed")).unwrap());

        let stored = goals.load().unwrap();
        assert_eq!(stored[0].title, "changed");
        assert_eq!(stored[1].title, "second");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let env = TestEnv::new();
        let goals = env.storage().goals();
        goals.add(goal("g1", "Read")).unwrap();

        assert!(!goals.update(goal("nope", "x")).unwrap());
        assert_eq!(goals.load().unwrap(), vec![goal("g1", "Read")]);
    }

    #[test]
    fn test_delete_missing_id_does_not_create_file() {
        let env = TestEnv::new();
        let events = env.storage().events();

        assert!(!events.delete("missing").unwrap());
        assert!(!events.path().exists());
    }

    #[test]
    fn test_get_returns_first_match() {
        let env = TestEnv::new();
        let events = env.storage().events();
        let event = CalendarEvent {
            id: "e1".to_string(),
            title: "Dentist".to_string(),
            date: "2024-03-01".to_string(),
            time: "09:30".to_string(),
            ..Default::default()
        };
        events.add(event.clone()).unwrap();

        assert_eq!(events.get("e1").unwrap(), Some(event));
        assert_eq!(events.get("e2").unwrap(), None);
    }
}
