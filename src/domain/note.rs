//! The note entity and its builder.

use super::NoteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the current time truncated to millisecond precision.
///
/// Timestamps are persisted as epoch milliseconds, so anything finer would
/// not survive a round-trip through the store.
pub fn now_millis() -> DateTime<Utc> {
    to_millis(Utc::now())
}

/// Drops any sub-millisecond part of `at`.
fn to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

/// A short user-authored text note.
///
/// A note that has never been saved has no id; the store assigns one on
/// insert. `created_at` is fixed at construction, while `updated_at` is
/// refreshed with [`Note::touch`] before every update.
///
/// # Examples
///
/// ```
/// use notebox::domain::Note;
///
/// let note = Note::builder("Groceries", "milk, eggs")
///     .category("Home")
///     .build();
/// assert!(note.id().is_none());
/// assert_eq!(note.created_at(), note.updated_at());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: Option<NoteId>,
    title: String,
    content: String,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates an unsaved note stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::builder(title, content).build()
    }

    /// Creates a builder for constructing a Note.
    pub fn builder(title: impl Into<String>, content: impl Into<String>) -> NoteBuilder {
        NoteBuilder {
            id: None,
            title: title.into(),
            content: content.into(),
            category: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the store-assigned id, if the note has been saved.
    pub fn id(&self) -> Option<NoteId> {
        self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note's body text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the free-form category label (empty when unset).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns when the note was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the note was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy of this note carrying the given id.
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Refreshes `updated_at` to the current time.
    ///
    /// Never moves the timestamp backwards, even if the wall clock did.
    pub fn touch(&mut self) {
        self.touch_at(now_millis());
    }

    /// Refreshes `updated_at` to `at` (at millisecond precision), keeping it
    /// monotonic.
    pub fn touch_at(&mut self, at: DateTime<Utc>) {
        let at = to_millis(at);
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a Note.
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: String,
    content: String,
    category: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl NoteBuilder {
    /// Sets the id (used when rebuilding a note read from storage).
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the category label.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the creation timestamp, truncated to the millisecond.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(to_millis(at));
        self
    }

    /// Sets the last-updated timestamp, truncated to the millisecond.
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(to_millis(at));
        self
    }

    /// Builds the Note.
    ///
    /// Missing timestamps default to now; a missing `updated_at` defaults to
    /// `created_at`.
    pub fn build(self) -> Note {
        let created_at = self.created_at.unwrap_or_else(now_millis);
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}
