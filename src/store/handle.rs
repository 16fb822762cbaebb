//! Async store handle: offloaded storage calls plus live queries.

use super::changes::{ChangeTracker, Table};
use super::live::{LiveQuery, run_blocking};
use super::sqlite::SqliteStore;
use super::{NoteRepository, StoreResult};
use crate::domain::{Note, NoteId, NoteTagCrossRef, NoteWithTags, Tag, TagId};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const NOTES: &[Table] = &[Table::Notes];
const TAGS: &[Table] = &[Table::Tags];
const LINKS: &[Table] = &[Table::NoteTags];
const NOTES_AND_LINKS: &[Table] = &[Table::Notes, Table::NoteTags];
const TAGS_AND_LINKS: &[Table] = &[Table::Tags, Table::NoteTags];
const EVERYTHING: &[Table] = &[Table::Notes, Table::Tags, Table::NoteTags];

/// Shared handle to the notes store.
///
/// Cheap to clone; every clone talks to the same connection. Storage calls
/// run on Tokio's blocking pool and are serialized by the connection lock.
/// Each write that changes rows notifies the live queries that depend on
/// the touched tables.
///
/// Construct one at startup and pass it to whatever needs it.
#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<SqliteStore>>,
    changes: Arc<ChangeTracker>,
}

impl Store {
    /// Wraps an already-open SQLite store.
    pub fn new(store: SqliteStore) -> Self {
        Self {
            db: Arc::new(Mutex::new(store)),
            changes: Arc::new(ChangeTracker::new()),
        }
    }

    /// Opens or creates the database file at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let store = tokio::task::spawn_blocking(move || SqliteStore::open(&path)).await??;
        Ok(Self::new(store))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }

    /// Returns the change tracker shared by this handle's live queries.
    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    /// Blocks storage calls until the guard is dropped.
    #[cfg(test)]
    pub(crate) fn hold_lock(&self) -> std::sync::MutexGuard<'_, SqliteStore> {
        self.db.lock().unwrap()
    }

    async fn read<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&SqliteStore) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.db), move |store| f(&*store)).await
    }

    /// Runs a write; `f` reports whether any row changed so that no-op writes
    /// don't wake live queries.
    ///
    /// Notification happens on the blocking thread right after the commit, so
    /// it still reaches live queries if the caller drops this future early.
    async fn write<R, F>(&self, op: &'static str, tables: &'static [Table], f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut SqliteStore) -> StoreResult<(R, bool)> + Send + 'static,
        R: Send + 'static,
    {
        let changes = Arc::clone(&self.changes);
        run_blocking(Arc::clone(&self.db), move |store| {
            let (value, changed) = f(store)?;
            tracing::debug!(op, changed, "store write");
            if changed {
                changes.notify(tables);
            }
            Ok(value)
        })
        .await
    }

    fn live<T, F>(&self, label: &'static str, tables: &'static [Table], query: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn(&SqliteStore) -> StoreResult<Vec<T>> + Send + Sync + 'static,
    {
        LiveQuery::spawn(
            Arc::clone(&self.db),
            self.changes.subscribe(),
            tables,
            label,
            query,
        )
    }

    // ===========================================
    // Notes
    // ===========================================

    /// Inserts a new note and returns its generated id.
    pub async fn create_note(&self, note: Note) -> StoreResult<NoteId> {
        self.write("create_note", NOTES, move |s| {
            Ok((s.insert_note(&note)?, true))
        })
        .await
    }

    /// Overwrites an existing note. The caller stamps `updated_at`.
    ///
    /// Fails with a not-found error when the note is unsaved or unknown.
    pub async fn update_note(&self, note: Note) -> StoreResult<()> {
        self.write("update_note", NOTES, move |s| {
            s.update_note(&note)?;
            Ok(((), true))
        })
        .await
    }

    /// Deletes a note and its tag links. Deleting an absent note is a no-op.
    pub async fn delete_note(&self, note: &Note) -> StoreResult<()> {
        match note.id() {
            Some(id) => self.delete_note_by_id(id).await,
            None => Ok(()),
        }
    }

    /// Deletes a note by id. Deleting an absent note is a no-op.
    pub async fn delete_note_by_id(&self, id: NoteId) -> StoreResult<()> {
        self.write("delete_note", NOTES_AND_LINKS, move |s| {
            Ok(((), s.delete_note(id)?))
        })
        .await
    }

    /// Deletes every note. Returns how many were removed.
    pub async fn delete_all_notes(&self) -> StoreResult<usize> {
        self.write("delete_all_notes", NOTES_AND_LINKS, |s| {
            let removed = s.delete_all_notes()?;
            Ok((removed, removed > 0))
        })
        .await
    }

    pub async fn get_note_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.read(move |s| s.get_note(id)).await
    }

    /// Live list of all notes, newest-created first.
    pub fn all_notes(&self) -> LiveQuery<Note> {
        self.live("all_notes", NOTES, |s| s.list_notes())
    }

    /// Live case-insensitive search over title and content, most recently
    /// updated first. The empty query matches every note.
    pub fn search_notes(&self, query: impl Into<String>) -> LiveQuery<Note> {
        let query = query.into();
        self.live("search_notes", NOTES, move |s| s.search_notes(&query))
    }

    /// Live list of notes in exactly this category, most recently updated first.
    pub fn notes_by_category(&self, category: impl Into<String>) -> LiveQuery<Note> {
        let category = category.into();
        self.live("notes_by_category", NOTES, move |s| {
            s.notes_by_category(&category)
        })
    }

    /// Live list of distinct non-empty categories, ascending.
    pub fn all_categories(&self) -> LiveQuery<String> {
        self.live("all_categories", NOTES, |s| s.categories())
    }

    // ===========================================
    // Tags
    // ===========================================

    /// Inserts a tag, or overwrites the row with the same id.
    pub async fn create_tag(&self, tag: Tag) -> StoreResult<TagId> {
        self.write("create_tag", TAGS, move |s| Ok((s.insert_tag(&tag)?, true)))
            .await
    }

    /// Overwrites an existing tag's name and color.
    pub async fn update_tag(&self, tag: Tag) -> StoreResult<()> {
        self.write("update_tag", TAGS, move |s| {
            s.update_tag(&tag)?;
            Ok(((), true))
        })
        .await
    }

    /// Deletes a tag and its note links; the notes themselves are kept.
    pub async fn delete_tag(&self, tag: &Tag) -> StoreResult<()> {
        let Some(id) = tag.id() else {
            return Ok(());
        };
        self.write("delete_tag", TAGS_AND_LINKS, move |s| {
            Ok(((), s.delete_tag(id)?))
        })
        .await
    }

    pub async fn get_tag_by_id(&self, id: TagId) -> StoreResult<Option<Tag>> {
        self.read(move |s| s.get_tag(id)).await
    }

    /// Live list of all tags ordered by name.
    pub fn all_tags(&self) -> LiveQuery<Tag> {
        self.live("all_tags", TAGS, |s| s.list_tags())
    }

    // ===========================================
    // Note-Tag Links
    // ===========================================

    /// Links a note to a tag. Linking twice is a no-op.
    pub async fn add_tag_to_note(&self, note_id: NoteId, tag_id: TagId) -> StoreResult<()> {
        self.write("add_tag_to_note", LINKS, move |s| {
            Ok(((), s.insert_cross_ref(NoteTagCrossRef::new(note_id, tag_id))?))
        })
        .await
    }

    /// Unlinks a note from a tag. Removing an absent link is a no-op.
    pub async fn remove_tag_from_note(&self, note_id: NoteId, tag_id: TagId) -> StoreResult<()> {
        self.write("remove_tag_from_note", LINKS, move |s| {
            Ok(((), s.delete_cross_ref(NoteTagCrossRef::new(note_id, tag_id))?))
        })
        .await
    }

    /// Reads a note with its tags as one consistent snapshot.
    pub async fn get_note_with_tags(&self, id: NoteId) -> StoreResult<Option<NoteWithTags>> {
        self.read(move |s| s.get_note_with_tags(id)).await
    }

    /// Live list of every note with its tags, most recently updated first.
    pub fn all_notes_with_tags(&self) -> LiveQuery<NoteWithTags> {
        self.live("all_notes_with_tags", EVERYTHING, |s| s.list_notes_with_tags())
    }

    /// Live search that also carries each note's tags.
    pub fn search_notes_with_tags(&self, query: impl Into<String>) -> LiveQuery<NoteWithTags> {
        let query = query.into();
        self.live("search_notes_with_tags", EVERYTHING, move |s| {
            s.search_notes_with_tags(&query)
        })
    }

    /// Live list of the notes linked to `tag_id`, most recently updated first.
    pub fn notes_with_tag(&self, tag_id: TagId) -> LiveQuery<Note> {
        self.live("notes_with_tag", NOTES_AND_LINKS, move |s| {
            s.notes_with_tag(tag_id)
        })
    }
}
