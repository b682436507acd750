//! Calendar events.

use super::{Created, Describe, Listed, Mutation, choose_id, now_timestamp, validate_date, validate_time};
use crate::Result;
use crate::models::CalendarEvent;
use crate::storage::Storage;

const NOUN: &str = "event";

impl Describe for CalendarEvent {
    fn describe(&self) -> String {
        let mut line = format!("[{}] {} {} {}", self.id, self.date, self.time, self.title);
        if !self.description.is_empty() {
            line.push_str(&format!(" - {}", self.description));
        }
        line
    }
}

/// Fields accepted when creating or editing an event.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl EventFields {
    fn validate(&self) -> Result<()> {
        if let Some(date) = &self.date {
            validate_date(date, "date")?;
        }
        if let Some(time) = &self.time {
            validate_time(time)?;
        }
        Ok(())
    }

    fn apply(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(color) = self.color {
            event.color = color;
        }
    }
}

/// Store a new event. `date` is `YYYY-MM-DD`, `time` is `HH:MM`.
pub fn event_add(
    storage: &Storage,
    fields: EventFields,
    id: Option<String>,
) -> Result<Created<CalendarEvent>> {
    fields.validate()?;

    let seed = format!(
        "{}{}",
        fields.title.as_deref().unwrap_or_default(),
        fields.date.as_deref().unwrap_or_default()
    );
    let mut record = CalendarEvent {
        id: choose_id(id, "evt", &seed),
        created_at: now_timestamp(),
        ..Default::default()
    };
    fields.apply(&mut record);

    storage.events().add(record.clone())?;
    Ok(Created { record })
}

/// List events, optionally only those on one day, ordered by date and time.
pub fn event_list(storage: &Storage, date: Option<&str>) -> Result<Listed<CalendarEvent>> {
    if let Some(date) = date {
        validate_date(date, "date")?;
    }

    let mut listed = Listed::from_loaded(NOUN, storage.events().load_or_default());
    listed
        .items
        .sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
    Ok(match date {
        Some(day) => listed.retain(|e| e.date == day),
        None => listed,
    })
}

pub fn event_update(storage: &Storage, id: &str, fields: EventFields) -> Result<Mutation> {
    fields.validate()?;

    let events = storage.events();
    let Some(mut record) = events.get(id)? else {
        return Ok(Mutation::new(NOUN, "updated", id, false));
    };
    fields.apply(&mut record);

    let changed = events.update(record)?;
    Ok(Mutation::new(NOUN, "updated", id, changed))
}

pub fn event_delete(storage: &Storage, id: &str) -> Result<Mutation> {
    let changed = storage.events().delete(id)?;
    Ok(Mutation::new(NOUN, "deleted", id, changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    fn fields(title: &str, date: &str, time: &str) -> EventFields {
        EventFields {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            time: Some(time.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_event_add_validates_date_and_time() {
        let env = TestEnv::new();
        let storage = env.storage();

        assert!(event_add(&storage, fields("x", "2024-13-01", "10:00"), None).is_err());
        assert!(event_add(&storage, fields("x", "2024-01-01", "9h"), None).is_err());
        assert!(!storage.events().path().exists());

        let created = event_add(&storage, fields("Dentist", "2024-03-01", "09:30"), None).unwrap();
        assert!(created.record.id.starts_with("evt-"));
    }

    #[test]
    fn test_event_list_sorted_and_filtered() {
        let env = TestEnv::new();
        let storage = env.storage();
        event_add(&storage, fields("late", "2024-03-02", "18:00"), None).unwrap();
        event_add(&storage, fields("early", "2024-03-01", "08:00"), None).unwrap();
        event_add(&storage, fields("noon", "2024-03-02", "12:00"), None).unwrap();

        let all = event_list(&storage, None).unwrap();
        let titles: Vec<_> = all.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "noon", "late"]);

        let day = event_list(&storage, Some("2024-03-02")).unwrap();
        assert_eq!(day.count, 2);
    }

    #[test]
    fn test_event_update_changes_only_given_fields() {
        let env = TestEnv::new();
        let storage = env.storage();
        event_add(&storage, fields("Gym", "2024-03-01", "07:00"), Some("e1".to_string())).unwrap();

        let update = EventFields {
            time: Some("07:30".to_string()),
            color: Some("#ff0000".to_string()),
            ..Default::default()
        };
        assert!(event_update(&storage, "e1", update).unwrap().changed);

        let stored = storage.events().get("e1").unwrap().unwrap();
        assert_eq!(stored.title, "Gym");
        assert_eq!(stored.time, "07:30");
        assert_eq!(stored.color, "#ff0000");
    }
}
