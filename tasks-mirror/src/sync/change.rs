//! Field-level change detection between a mirror row and a projected record.

use super::record::ProjectedRecord;
use super::schema;
use crate::connectors::notion::{Properties, PropertyValue};
use chrono::{DateTime, NaiveDate, Utc};

/// The six fields compared between a mirror row and a projected record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparableFields {
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub updated_at: Option<String>,
}

fn extract(
    properties: &Properties,
    name: &str,
    rule: fn(&PropertyValue) -> Option<&str>,
) -> Option<String> {
    properties.get(name).and_then(rule).map(str::to_string)
}

impl ComparableFields {
    /// Applies each field's extraction rule. Missing properties extract to `None`.
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            status: extract(properties, schema::STATUS, PropertyValue::select_label),
            description: extract(properties, schema::DESCRIPTION, PropertyValue::first_text),
            start_date: extract(properties, schema::START_DATE, PropertyValue::date_start),
            due_date: extract(properties, schema::DUE_DATE, PropertyValue::date_start),
            completed_at: extract(properties, schema::COMPLETED_AT, PropertyValue::date_start),
            updated_at: extract(properties, schema::UPDATED_AT, PropertyValue::date_start),
        }
    }
}

/// Date values compare as instants when they parse, so that equivalent
/// spellings of one timestamp are equal.
#[derive(Debug, PartialEq, Eq)]
enum DateKey<'a> {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
    Raw(&'a str),
}

fn date_key(value: &str) -> DateKey<'_> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return DateKey::Instant(instant.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return DateKey::Day(day);
    }
    DateKey::Raw(value)
}

fn text_equal(stored: &Option<String>, projected: &Option<String>) -> bool {
    stored == projected
}

fn date_equal(stored: &Option<String>, projected: &Option<String>) -> bool {
    match (stored, projected) {
        (Some(a), Some(b)) => date_key(a) == date_key(b),
        (None, None) => true,
        _ => false,
    }
}

/// Returns true at the first of the six comparable fields whose normalized
/// values differ. Absent equals absent.
pub fn has_changed(existing: &ComparableFields, projected: &ProjectedRecord) -> bool {
    let outgoing = ComparableFields::from_properties(&projected.to_properties());
    !(text_equal(&existing.status, &outgoing.status)
        && text_equal(&existing.description, &outgoing.description)
        && date_equal(&existing.start_date, &outgoing.start_date)
        && date_equal(&existing.due_date, &outgoing.due_date)
        && date_equal(&existing.completed_at, &outgoing.completed_at)
        && date_equal(&existing.updated_at, &outgoing.updated_at))
}
