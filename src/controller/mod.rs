//! UI-facing state: search text, category filter, and the active note list.

mod filter;
mod tags;


pub use filter::{NoteFilter, NoteSource};
pub use tags::TagChanges;

use crate::domain::{Note, NoteId, NoteWithTags, Tag, TagId};
use crate::store::{LiveQuery, Store, StoreError, StoreResult};
use std::collections::BTreeSet;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Holds the ephemeral list filter and turns user intents into store calls.
///
/// Filter changes are plain assignments; every stream from
/// [`active_notes`](Self::active_notes) re-derives itself, dropping the query
/// for the previous filter before subscribing to the new one, so results for
/// superseded input never reach the subscriber.
///
/// Mutations are fire-and-forget: they run on a spawned task and return its
/// handle, which callers may await or ignore. Failures are logged either way.
///
/// Dropping the controller ends its active streams.
pub struct NotesController {
    store: Store,
    filter: watch::Sender<NoteFilter>,
}

impl NotesController {
    pub fn new(store: Store) -> Self {
        let (filter, _) = watch::channel(NoteFilter::default());
        Self { store, filter }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ===========================================
    // Filter State
    // ===========================================

    /// Returns a copy of the current filter.
    pub fn filter(&self) -> NoteFilter {
        self.filter.borrow().clone()
    }

    pub fn search_query(&self) -> String {
        self.filter.borrow().search_text.clone()
    }

    pub fn selected_category(&self) -> Option<String> {
        self.filter.borrow().selected_category.clone()
    }

    /// Sets the search text.
    pub fn update_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.filter.send_if_modified(|f| {
            if f.search_text == text {
                return false;
            }
            f.search_text = text;
            true
        });
    }

    /// Resets the search text to empty.
    pub fn clear_search(&self) {
        self.update_search_query(String::new());
    }

    /// Selects a category, or clears the selection with `None`.
    pub fn filter_by_category(&self, category: Option<String>) {
        self.filter.send_if_modified(|f| {
            if f.selected_category == category {
                return false;
            }
            f.selected_category = category;
            true
        });
    }

    pub fn clear_category_filter(&self) {
        self.filter_by_category(None);
    }

    // ===========================================
    // Derived Streams
    // ===========================================

    /// Live list of the notes matching the current filter.
    ///
    /// Emits a snapshot for the filter in effect at subscription and again
    /// after every data change, or whenever a filter change selects a
    /// different query.
    pub fn active_notes(&self) -> LiveQuery<Note> {
        let store = self.store.clone();
        let mut filter_rx = self.filter.subscribe();
        let (tx, rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let mut filter = filter_rx.borrow_and_update().clone();
            loop {
                tracing::debug!(?filter, "deriving active notes");
                let mut inner = filter.subscribe(&store);

                loop {
                    tokio::select! {
                        biased;
                        switched = next_source(&mut filter_rx, &mut filter) => {
                            if !switched {
                                return;
                            }
                            break;
                        }
                        item = inner.next() => {
                            let Some(result) = item else {
                                // Inner stream closed with the store; wait for new input.
                                if !next_source(&mut filter_rx, &mut filter).await {
                                    return;
                                }
                                break;
                            };
                            // A query switch while the subscriber is busy discards this result.
                            let permit = tokio::select! {
                                biased;
                                switched = next_source(&mut filter_rx, &mut filter) => {
                                    if !switched {
                                        return;
                                    }
                                    break;
                                }
                                permit = tx.reserve() => match permit {
                                    Ok(permit) => permit,
                                    Err(_) => return,
                                },
                            };
                            let failed = result.is_err();
                            permit.send(result);
                            if failed {
                                return;
                            }
                        }
                    }
                }
            }
        });

        LiveQuery::from_parts(rx, task)
    }

    pub fn all_notes_with_tags(&self) -> LiveQuery<NoteWithTags> {
        self.store.all_notes_with_tags()
    }

    pub fn all_categories(&self) -> LiveQuery<String> {
        self.store.all_categories()
    }

    pub fn all_tags(&self) -> LiveQuery<Tag> {
        self.store.all_tags()
    }

    pub fn notes_with_tag(&self, tag_id: TagId) -> LiveQuery<Note> {
        self.store.notes_with_tag(tag_id)
    }

    // ===========================================
    // Note Intents
    // ===========================================

    fn launch<R, F>(op: &'static str, fut: F) -> JoinHandle<StoreResult<R>>
    where
        R: Send + 'static,
        F: Future<Output = StoreResult<R>> + Send + 'static,
    {
        tokio::spawn(async move {
            let result = fut.await;
            if let Err(err) = &result {
                tracing::warn!(op, error = %err, "note operation failed");
            }
            result
        })
    }

    /// Saves a new note.
    pub fn insert(&self, note: Note) -> JoinHandle<StoreResult<NoteId>> {
        let store = self.store.clone();
        Self::launch("insert", async move { store.create_note(note).await })
    }

    /// Saves a new note and waits for its id.
    pub async fn insert_and_get_id(&self, note: Note) -> StoreResult<NoteId> {
        self.store.create_note(note).await
    }

    /// Saves a new note and links it to `tags`.
    pub fn insert_with_tags(&self, note: Note, tags: Vec<Tag>) -> JoinHandle<StoreResult<NoteId>> {
        let store = self.store.clone();
        Self::launch("insert_with_tags", async move {
            let id = store.create_note(note).await?;
            for tag_id in tags.iter().filter_map(Tag::id) {
                store.add_tag_to_note(id, tag_id).await?;
            }
            Ok(id)
        })
    }

    /// Stamps `updated_at` and saves an edited note.
    pub fn update(&self, mut note: Note) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("update", async move {
            note.touch();
            store.update_note(note).await
        })
    }

    /// Saves a note and makes its tag links match `tags` exactly.
    ///
    /// An unsaved note is created. For an existing note `updated_at` is
    /// stamped, and only the links that differ from the current set are
    /// added or removed. Tags that were never saved are skipped.
    pub fn save_note_with_tags(&self, note: Note, tags: Vec<Tag>) -> JoinHandle<StoreResult<NoteId>> {
        let store = self.store.clone();
        Self::launch("save_note_with_tags", async move {
            save_with_tags(&store, note, &tags).await
        })
    }

    pub fn delete(&self, note: Note) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("delete", async move { store.delete_note(&note).await })
    }

    pub fn delete_all(&self) -> JoinHandle<StoreResult<usize>> {
        let store = self.store.clone();
        Self::launch("delete_all", async move { store.delete_all_notes().await })
    }

    pub async fn get_note_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.store.get_note_by_id(id).await
    }

    pub async fn get_note_with_tags(&self, id: NoteId) -> StoreResult<Option<NoteWithTags>> {
        self.store.get_note_with_tags(id).await
    }

    // ===========================================
    // Tag Intents
    // ===========================================

    pub fn insert_tag(&self, tag: Tag) -> JoinHandle<StoreResult<TagId>> {
        let store = self.store.clone();
        Self::launch("insert_tag", async move { store.create_tag(tag).await })
    }

    pub fn update_tag(&self, tag: Tag) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("update_tag", async move { store.update_tag(tag).await })
    }

    pub fn delete_tag(&self, tag: Tag) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("delete_tag", async move { store.delete_tag(&tag).await })
    }

    pub fn add_tag_to_note(&self, note_id: NoteId, tag_id: TagId) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("add_tag_to_note", async move {
            store.add_tag_to_note(note_id, tag_id).await
        })
    }

    pub fn remove_tag_from_note(&self, note_id: NoteId, tag_id: TagId) -> JoinHandle<StoreResult<()>> {
        let store = self.store.clone();
        Self::launch("remove_tag_from_note", async move {
            store.remove_tag_from_note(note_id, tag_id).await
        })
    }
}

async fn save_with_tags(store: &Store, mut note: Note, tags: &[Tag]) -> StoreResult<NoteId> {
    let desired: BTreeSet<TagId> = tags.iter().filter_map(Tag::id).collect();
    if desired.len() < tags.len() {
        tracing::debug!(
            skipped = tags.len() - desired.len(),
            "ignoring unsaved or repeated tags"
        );
    }

    let (id, current) = match note.id() {
        Some(id) => {
            note.touch();
            store.update_note(note).await?;
            let current = store
                .get_note_with_tags(id)
                .await?
                .ok_or(StoreError::NoteNotFound { id })?
                .tag_ids();
            (id, current)
        }
        None => (store.create_note(note).await?, BTreeSet::new()),
    };

    let changes = TagChanges::between(&current, &desired);
    tracing::debug!(note = %id, add = ?changes.add, remove = ?changes.remove, "syncing note tags");
    for tag_id in changes.add {
        store.add_tag_to_note(id, tag_id).await?;
    }
    for tag_id in changes.remove {
        store.remove_tag_from_note(id, tag_id).await?;
    }
    Ok(id)
}

/// Waits for a filter change that selects a different query, keeping
/// `current` up to date along the way.
///
/// Returns false once the controller is gone.
async fn next_source(rx: &mut watch::Receiver<NoteFilter>, current: &mut NoteFilter) -> bool {
    loop {
        if rx.changed().await.is_err() {
            return false;
        }
        let next = rx.borrow_and_update().clone();
        let switched = next.source() != current.source();
        *current = next;
        if switched {
            return true;
        }
    }
}
