//! Database property values in Notion's structured representation.
//!
//! Three extraction rules turn a property into a comparable string:
//! the first rich-text segment, the select label, and the date start.
//! They apply equally to values read from Notion and to values about to be
//! written, which is what lets change detection compare the two.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum length Notion accepts in a single rich-text segment, in UTF-16 code units.
pub const MAX_SEGMENT_CHARS: usize = 2000;

/// Property name to value, as sent to and received from Notion.
pub type Properties = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Select { select: Option<SelectOption> },
    Date { date: Option<DateRange> },
    /// Any property type this mirror does not track.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    /// Read-only rendering Notion returns for every segment kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            text: Some(TextContent {
                content: content.into(),
            }),
            plain_text: None,
        }
    }

    /// The segment's text, falling back to `plain_text` for mentions and equations.
    pub fn content(&self) -> Option<&str> {
        self.text
            .as_ref()
            .map(|t| t.content.as_str())
            .or(self.plain_text.as_deref())
    }
}

/// Splits `content` into segments no longer than [`MAX_SEGMENT_CHARS`].
///
/// Length is measured in UTF-16 code units and a surrogate pair is never split.
fn segments(content: &str) -> Vec<RichText> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut units = 0;
    for c in content.chars() {
        if units + c.len_utf16() > MAX_SEGMENT_CHARS {
            parts.push(RichText::plain(std::mem::take(&mut current)));
            units = 0;
        }
        units += c.len_utf16();
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(RichText::plain(current));
    }
    parts
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        PropertyValue::Title {
            title: vec![RichText::plain(content)],
        }
    }

    /// A rich-text value, split into as many segments as Notion requires.
    pub fn rich_text(content: impl AsRef<str>) -> Self {
        PropertyValue::RichText {
            rich_text: segments(content.as_ref()),
        }
    }

    pub fn select(name: impl Into<String>) -> Self {
        PropertyValue::Select {
            select: Some(SelectOption { name: name.into() }),
        }
    }

    pub fn date(start: impl Into<String>) -> Self {
        PropertyValue::Date {
            date: Some(DateRange {
                start: start.into(),
                end: None,
            }),
        }
    }

    /// First rich-text segment of a title or rich-text property.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Title { title: parts } | PropertyValue::RichText { rich_text: parts } => {
                parts.first().and_then(RichText::content)
            }
            _ => None,
        }
    }

    /// Display name of the chosen option of a select property.
    pub fn select_label(&self) -> Option<&str> {
        match self {
            PropertyValue::Select { select } => select.as_ref().map(|s| s.name.as_str()),
            _ => None,
        }
    }

    /// Start value of a date property.
    pub fn date_start(&self) -> Option<&str> {
        match self {
            PropertyValue::Date { date } => date.as_ref().map(|d| d.start.as_str()),
            _ => None,
        }
    }
}
