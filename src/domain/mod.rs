//! Core types: Note, Tag, their integer ids, and the note/tag association

mod id;
mod note;
mod note_with_tags;
mod tag;

pub use id::{NoteId, ParseIdError, TagId};
pub use note::{Note, NoteBuilder, now_millis};
pub use note_with_tags::{NoteTagCrossRef, NoteWithTags};
pub use tag::{DEFAULT_TAG_COLOR, Tag};
