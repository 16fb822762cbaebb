//! The search/category filter and the rule that turns it into a query.

use crate::domain::Note;
use crate::store::{LiveQuery, Store};
use serde::Serialize;

/// Ephemeral list filter owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteFilter {
    pub search_text: String,
    pub selected_category: Option<String>,
}

/// Which store query backs the active note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource<'a> {
    Search(&'a str),
    Category(&'a str),
    All,
}

impl NoteFilter {
    /// Picks the query for this filter.
    ///
    /// Non-blank search text wins and ignores the category; otherwise a
    /// selected category filters; otherwise every note is listed.
    pub fn source(&self) -> NoteSource<'_> {
        if !self.search_text.trim().is_empty() {
            NoteSource::Search(&self.search_text)
        } else if let Some(category) = &self.selected_category {
            NoteSource::Category(category)
        } else {
            NoteSource::All
        }
    }

    /// Subscribes to the live query chosen by [`source`](Self::source).
    pub fn subscribe(&self, store: &Store) -> LiveQuery<Note> {
        match self.source() {
            NoteSource::Search(text) => store.search_notes(text),
            NoteSource::Category(category) => store.notes_by_category(category),
            NoteSource::All => store.all_notes(),
        }
    }
}
