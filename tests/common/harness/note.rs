//! Builder for test notes with sensible defaults.

// Test utility; not every helper is used by every test binary
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use notebox::domain::Note;

/// Builder for creating test notes with sensible defaults.
///
/// Tags are given by name; [`TestEnv::add_note`](super::TestEnv::add_note)
/// creates any that do not exist yet.
#[derive(Debug)]
pub struct TestNote {
    title: String,
    content: String,
    category: String,
    tags: Vec<String>,
    updated: Option<DateTime<Utc>>,
}

impl TestNote {
    /// Creates a new test note with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            category: String::new(),
            tags: Vec::new(),
            updated: None,
        }
    }

    /// Sets the body content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Adds a tag to the note.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Pins both timestamps to `millis` since the epoch.
    pub fn updated_millis(mut self, millis: i64) -> Self {
        self.updated = DateTime::from_timestamp_millis(millis);
        self
    }

    /// Returns the tag names.
    pub fn tag_names(&self) -> &[String] {
        &self.tags
    }

    /// Converts to a domain Note without an id.
    pub fn to_note(&self) -> Note {
        let mut builder =
            Note::builder(self.title.as_str(), self.content.as_str()).category(self.category.as_str());
        if let Some(at) = self.updated {
            builder = builder.created_at(at).updated_at(at);
        }
        builder.build()
    }
}
