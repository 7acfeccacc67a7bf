//! Projection of source tasks into mirror rows.

use super::{IdentityKey, schema};
use crate::connectors::google_tasks::Task;
use crate::connectors::notion::{Properties, PropertyValue};

/// Title given to tasks that have none.
pub const UNTITLED: &str = "Untitled";

/// A source task expressed as mirror fields.
///
/// `None` means the field is omitted: it is neither written nor compared, so
/// a mirror value with no source counterpart is never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedRecord {
    pub title: String,
    pub list: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub updated_at: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Maps a task and the name of its list to mirror fields. Never fails.
pub fn project(task: &Task, list_name: &str) -> ProjectedRecord {
    let title = task
        .title
        .as_ref()
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| UNTITLED.to_string());

    ProjectedRecord {
        title,
        list: list_name.to_string(),
        status: task.status.clone(),
        description: present(&task.notes),
        start_date: present(&task.start),
        due_date: present(&task.due),
        completed_at: present(&task.completed),
        updated_at: present(&task.updated),
    }
}

impl ProjectedRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.title, &self.list)
    }

    /// The write payload. Omitted fields have no entry at all.
    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.insert(schema::NAME.to_string(), PropertyValue::title(&self.title));
        properties.insert(schema::LIST.to_string(), PropertyValue::rich_text(&self.list));

        let mut put = |name: &str, value: Option<PropertyValue>| {
            if let Some(value) = value {
                properties.insert(name.to_string(), value);
            }
        };
        put(schema::STATUS, self.status.as_ref().map(PropertyValue::select));
        put(
            schema::DESCRIPTION,
            self.description.as_ref().map(PropertyValue::rich_text),
        );
        put(schema::START_DATE, self.start_date.as_ref().map(PropertyValue::date));
        put(schema::DUE_DATE, self.due_date.as_ref().map(PropertyValue::date));
        put(
            schema::COMPLETED_AT,
            self.completed_at.as_ref().map(PropertyValue::date),
        );
        put(schema::UPDATED_AT, self.updated_at.as_ref().map(PropertyValue::date));
        properties
    }
}
