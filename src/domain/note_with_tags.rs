//! The note/tag association row and the joined read view.

use super::{Note, NoteId, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of the many-to-many link between a note and a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteTagCrossRef {
    pub note_id: NoteId,
    pub tag_id: TagId,
}

impl NoteTagCrossRef {
    pub fn new(note_id: NoteId, tag_id: TagId) -> Self {
        Self { note_id, tag_id }
    }
}

/// A note together with its tags, ordered by tag name.
///
/// Never persisted; produced by joining notes, tags, and the association
/// table in a single read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithTags {
    note: Note,
    tags: Vec<Tag>,
}

impl NoteWithTags {
    /// Pairs a note with its tags, sorting the tags by name then id.
    pub fn new(note: Note, mut tags: Vec<Tag>) -> Self {
        tags.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Self { note, tags }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns the ids of the attached tags.
    pub fn tag_ids(&self) -> BTreeSet<TagId> {
        self.tags.iter().filter_map(Tag::id).collect()
    }

    /// Splits the view back into its parts.
    pub fn into_parts(self) -> (Note, Vec<Tag>) {
        (self.note, self.tags)
    }
}
