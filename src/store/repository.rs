//! NoteRepository trait: the one-shot operations of the store.

use crate::domain::{Note, NoteId, NoteTagCrossRef, NoteWithTags, Tag, TagId};
use crate::store::StoreResult;

/// Synchronous repository over notes, tags, and their association.
///
/// Ordering contracts:
/// - `list_notes` is newest-created first (id descending).
/// - every other note listing is most-recently-updated first.
/// - tags are ordered by name.
///
/// Not-found policy: updates and links that reference an absent row fail with
/// a not-found error; deletes and unlinks of absent rows succeed and report
/// `false`.
pub trait NoteRepository {
    /// Inserts a new note and returns its generated id.
    ///
    /// Any id already on `note` is ignored.
    fn insert_note(&mut self, note: &Note) -> StoreResult<NoteId>;

    /// Overwrites title, content, category, and `updated_at` of an existing note.
    ///
    /// The caller stamps `updated_at`; the store writes it as given.
    fn update_note(&mut self, note: &Note) -> StoreResult<()>;

    /// Deletes a note and its tag links. Returns whether a note was removed.
    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool>;

    /// Deletes every note and every tag link. Returns the number of notes removed.
    fn delete_all_notes(&mut self) -> StoreResult<usize>;

    /// Retrieves a single note by id.
    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>>;

    /// Lists all notes, newest-created first.
    fn list_notes(&self) -> StoreResult<Vec<Note>>;

    /// Case-insensitive substring search over title and content.
    ///
    /// An empty query matches every note.
    fn search_notes(&self, query: &str) -> StoreResult<Vec<Note>>;

    /// Lists notes whose category equals `category` exactly.
    fn notes_by_category(&self, category: &str) -> StoreResult<Vec<Note>>;

    /// Returns the distinct non-empty categories in ascending order.
    fn categories(&self) -> StoreResult<Vec<String>>;

    /// Inserts a tag, or overwrites the existing row when the tag carries an id.
    fn insert_tag(&mut self, tag: &Tag) -> StoreResult<TagId>;

    /// Overwrites name and color of an existing tag.
    fn update_tag(&mut self, tag: &Tag) -> StoreResult<()>;

    /// Deletes a tag and its note links, leaving the notes untouched.
    fn delete_tag(&mut self, id: TagId) -> StoreResult<bool>;

    /// Retrieves a single tag by id.
    fn get_tag(&self, id: TagId) -> StoreResult<Option<Tag>>;

    /// Lists all tags ordered by name.
    fn list_tags(&self) -> StoreResult<Vec<Tag>>;

    /// Links a note to a tag. Returns `false` if the link already existed.
    fn insert_cross_ref(&mut self, cross_ref: NoteTagCrossRef) -> StoreResult<bool>;

    /// Unlinks a note from a tag. Returns `false` if there was no link.
    fn delete_cross_ref(&mut self, cross_ref: NoteTagCrossRef) -> StoreResult<bool>;

    /// Reads a note and its tags in one consistent snapshot.
    fn get_note_with_tags(&self, id: NoteId) -> StoreResult<Option<NoteWithTags>>;

    /// Reads every note with its tags in one consistent snapshot.
    fn list_notes_with_tags(&self) -> StoreResult<Vec<NoteWithTags>>;

    /// Searches notes like [`search_notes`](Self::search_notes) and attaches their tags.
    fn search_notes_with_tags(&self, query: &str) -> StoreResult<Vec<NoteWithTags>>;

    /// Lists the notes linked to the given tag.
    fn notes_with_tag(&self, tag_id: TagId) -> StoreResult<Vec<Note>>;
}
