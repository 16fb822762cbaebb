//! Output format types for CLI commands.

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Note, NoteWithTags, Tag};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: Option<i64>,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().map(i64::from),
            title: note.title().to_string(),
            category: note.category().to_string(),
            created_at: note.created_at(),
            updated_at: note.updated_at(),
        }
    }
}

/// A note with its body and tags, as printed by `show`.
#[derive(Debug, Serialize)]
pub struct NoteDetail {
    #[serde(flatten)]
    pub note: NoteListing,
    pub content: String,
    pub tags: Vec<TagListing>,
}

impl From<&NoteWithTags> for NoteDetail {
    fn from(item: &NoteWithTags) -> Self {
        Self {
            note: NoteListing::from(item.note()),
            content: item.note().content().to_string(),
            tags: item.tags().iter().map(TagListing::from).collect(),
        }
    }
}

/// A tag in listing output.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub id: Option<i64>,
    pub name: String,
    pub color: String,
}

impl From<&Tag> for TagListing {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id().map(i64::from),
            name: tag.name().to_string(),
            color: tag.color().to_string(),
        }
    }
}

/// Formats a stored timestamp in local time for human output.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoteId, TagId};
    use pretty_assertions::assert_eq;

    #[test]
    fn note_listing_json_shape() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let note = Note::builder("Groceries", "milk")
            .id(NoteId::new(4))
            .category("home")
            .created_at(at)
            .build();
        let json = serde_json::to_value(Output::new(vec![NoteListing::from(&note)])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [{
                    "id": 4,
                    "title": "Groceries",
                    "category": "home",
                    "created_at": "2023-11-14T22:13:20Z",
                    "updated_at": "2023-11-14T22:13:20Z",
                }]
            })
        );
    }

    #[test]
    fn detail_flattens_note_fields() {
        let note = Note::new("a", "body").with_id(NoteId::new(1));
        let tag = Tag::with_color("red", "#FF0000").with_id(TagId::new(9));
        let detail = NoteDetail::from(&NoteWithTags::new(note, vec![tag]));
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["content"], "body");
        assert_eq!(json["tags"][0]["name"], "red");
        assert_eq!(json["tags"][0]["color"], "#FF0000");
    }
}
