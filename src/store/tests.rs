//! Async handle and live query tests.

use super::*;
use crate::domain::{Note, NoteId, Tag, TagId};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::timeout;

// ===========================================
// Test Helpers
// ===========================================

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(150);

async fn snapshot<T: Send + 'static>(query: &mut LiveQuery<T>) -> Vec<T> {
    timeout(WAIT, query.next())
        .await
        .expect("live query should emit")
        .expect("live query should still be open")
        .expect("live query should succeed")
}

async fn assert_quiet<T: Send + std::fmt::Debug + 'static>(query: &mut LiveQuery<T>) {
    if let Ok(item) = timeout(QUIET, query.next()).await {
        panic!("expected no emission, got {item:?}");
    }
}

fn titles(notes: &[Note]) -> Vec<String> {
    notes.iter().map(|n| n.title().to_string()).collect()
}

fn categorized(title: &str, category: &str) -> Note {
    Note::builder(title, "").category(category).build()
}

// ===========================================
// Opening
// ===========================================

#[tokio::test]
async fn open_creates_database_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("notes.db");
    let store = Store::open(&path).await.unwrap();
    store.create_note(Note::new("a", "b")).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn open_garbage_file_is_storage_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.db");
    std::fs::write(&path, "plain text pretending to be a database file, nope").unwrap();

    let err = Store::open(&path).await.err().expect("open should fail");
    assert!(matches!(err, StoreError::StorageUnavailable { .. }), "got {err:?}");
}

// ===========================================
// One-Shot Operations
// ===========================================

#[tokio::test]
async fn create_then_get_round_trips() {
    let store = Store::open_in_memory().unwrap();
    let note = Note::builder("Groceries", "milk, eggs").category("Home").build();
    let id = store.create_note(note.clone()).await.unwrap();
    assert_eq!(store.get_note_by_id(id).await.unwrap(), Some(note.with_id(id)));
}

#[tokio::test]
async fn note_stamped_with_wall_clock_round_trips() {
    let store = Store::open_in_memory().unwrap();
    let now = chrono::Utc::now();
    let note = Note::builder("t", "c").created_at(now).updated_at(now).build();
    let id = store.create_note(note.clone()).await.unwrap();
    assert_eq!(store.get_note_by_id(id).await.unwrap(), Some(note.with_id(id)));
}

#[tokio::test]
async fn update_unknown_note_is_not_found() {
    let store = Store::open_in_memory().unwrap();
    let err = store
        .update_note(Note::new("x", "").with_id(NoteId::new(5)))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_unsaved_or_missing_note_is_ok() {
    let store = Store::open_in_memory().unwrap();
    store.delete_note(&Note::new("never saved", "")).await.unwrap();
    store.delete_note_by_id(NoteId::new(123)).await.unwrap();
}

#[tokio::test]
async fn note_with_tags_scenario() {
    let store = Store::open_in_memory().unwrap();
    let note_id = store
        .create_note(Note::new("Groceries", "milk, eggs"))
        .await
        .unwrap();
    let tag_id = store.create_tag(Tag::new("Home")).await.unwrap();
    store.add_tag_to_note(note_id, tag_id).await.unwrap();

    let view = store.get_note_with_tags(note_id).await.unwrap().unwrap();
    let names: Vec<&str> = view.tags().iter().map(Tag::name).collect();
    assert_eq!(names, vec!["Home"]);
}

#[tokio::test]
async fn get_tag_by_id_after_update() {
    let store = Store::open_in_memory().unwrap();
    let id = store.create_tag(Tag::new("old")).await.unwrap();
    store
        .update_tag(Tag::with_color("new", "#000000").with_id(id))
        .await
        .unwrap();
    let tag = store.get_tag_by_id(id).await.unwrap().unwrap();
    assert_eq!(tag.name(), "new");
    assert_eq!(store.get_tag_by_id(TagId::new(99)).await.unwrap(), None);
}

// ===========================================
// Live Queries
// ===========================================

#[tokio::test]
async fn all_notes_emits_new_snapshot_after_insert() {
    let store = Store::open_in_memory().unwrap();
    let mut notes = store.all_notes();
    assert!(snapshot(&mut notes).await.is_empty());

    let id = store.create_note(Note::new("fresh", "")).await.unwrap();

    let next = snapshot(&mut notes).await;
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].id(), Some(id));
}

#[tokio::test]
async fn abandoned_write_still_wakes_live_queries() {
    use futures::FutureExt;

    let store = Store::open_in_memory().unwrap();
    let mut notes = store.all_notes();
    assert!(snapshot(&mut notes).await.is_empty());

    // Poll once, then drop; the blocking write carries on without us
    let _ = store.create_note(Note::new("ghost", "")).now_or_never();

    assert_eq!(titles(&snapshot(&mut notes).await), vec!["ghost"]);
}

#[tokio::test]
async fn categories_scenario() {
    let store = Store::open_in_memory().unwrap();
    store.create_note(categorized("a", "Work")).await.unwrap();
    store.create_note(categorized("b", "Work")).await.unwrap();
    store.create_note(categorized("c", "Personal")).await.unwrap();

    let categories = store.all_categories().first().await.unwrap();
    assert_eq!(categories, vec!["Personal", "Work"]);
}

#[tokio::test]
async fn search_updates_when_a_note_starts_matching() {
    let store = Store::open_in_memory().unwrap();
    let id = store.create_note(Note::new("plain", "")).await.unwrap();
    let mut hits = store.search_notes("urgent");
    assert!(snapshot(&mut hits).await.is_empty());

    let mut note = store.get_note_by_id(id).await.unwrap().unwrap();
    note.set_content("URGENT: call back");
    note.touch();
    store.update_note(note).await.unwrap();

    assert_eq!(titles(&snapshot(&mut hits).await), vec!["plain"]);
}

#[tokio::test]
async fn notes_by_category_follows_recategorization() {
    let store = Store::open_in_memory().unwrap();
    let id = store.create_note(categorized("report", "Work")).await.unwrap();
    let mut work = store.notes_by_category("Work");
    assert_eq!(snapshot(&mut work).await.len(), 1);

    let mut note = store.get_note_by_id(id).await.unwrap().unwrap();
    note.set_category("Personal");
    store.update_note(note).await.unwrap();

    assert!(snapshot(&mut work).await.is_empty());
}

#[tokio::test]
async fn unrelated_writes_do_not_wake_queries() {
    let store = Store::open_in_memory().unwrap();
    let mut tags = store.all_tags();
    snapshot(&mut tags).await;

    store.create_note(Note::new("not a tag", "")).await.unwrap();

    assert_quiet(&mut tags).await;
}

#[tokio::test]
async fn duplicate_link_does_not_re_emit() {
    let store = Store::open_in_memory().unwrap();
    let n = store.create_note(Note::new("n", "")).await.unwrap();
    let t = store.create_tag(Tag::new("t")).await.unwrap();
    store.add_tag_to_note(n, t).await.unwrap();

    let mut tagged = store.notes_with_tag(t);
    assert_eq!(snapshot(&mut tagged).await.len(), 1);

    store.add_tag_to_note(n, t).await.unwrap();
    store.remove_tag_from_note(n, TagId::new(404)).await.unwrap();

    assert_quiet(&mut tagged).await;
}

#[tokio::test]
async fn deleting_tag_updates_joined_view() {
    let store = Store::open_in_memory().unwrap();
    let n = store.create_note(Note::new("n", "")).await.unwrap();
    let t = store.create_tag(Tag::new("gone")).await.unwrap();
    store.add_tag_to_note(n, t).await.unwrap();

    let mut views = store.all_notes_with_tags();
    assert_eq!(snapshot(&mut views).await[0].tags().len(), 1);

    let tag = store.get_tag_by_id(t).await.unwrap().unwrap();
    store.delete_tag(&tag).await.unwrap();

    let after = snapshot(&mut views).await;
    assert_eq!(after.len(), 1, "note survives tag deletion");
    assert!(after[0].tags().is_empty());
}

#[tokio::test]
async fn deleting_note_drops_it_from_notes_with_tag() {
    let store = Store::open_in_memory().unwrap();
    let n = store.create_note(Note::new("n", "")).await.unwrap();
    let t = store.create_tag(Tag::new("t")).await.unwrap();
    store.add_tag_to_note(n, t).await.unwrap();

    let mut tagged = store.notes_with_tag(t);
    assert_eq!(snapshot(&mut tagged).await.len(), 1);

    store.delete_note_by_id(n).await.unwrap();
    assert!(snapshot(&mut tagged).await.is_empty());
}

#[tokio::test]
async fn search_with_tags_re_emits_on_tag_rename() {
    let store = Store::open_in_memory().unwrap();
    let n = store.create_note(Note::new("agenda", "")).await.unwrap();
    let t = store.create_tag(Tag::new("before")).await.unwrap();
    store.add_tag_to_note(n, t).await.unwrap();

    let mut views = store.search_notes_with_tags("AGENDA");
    assert_eq!(snapshot(&mut views).await[0].tags()[0].name(), "before");

    store
        .update_tag(Tag::new("after").with_id(t))
        .await
        .unwrap();
    assert_eq!(snapshot(&mut views).await[0].tags()[0].name(), "after");
}

#[tokio::test]
async fn delete_all_notes_empties_streams() {
    let store = Store::open_in_memory().unwrap();
    store.create_note(Note::new("a", "")).await.unwrap();
    store.create_note(Note::new("b", "")).await.unwrap();
    let mut notes = store.all_notes();
    assert_eq!(snapshot(&mut notes).await.len(), 2);

    assert_eq!(store.delete_all_notes().await.unwrap(), 2);
    assert!(snapshot(&mut notes).await.is_empty());
    assert_eq!(store.delete_all_notes().await.unwrap(), 0);
    assert_quiet(&mut notes).await;
}

#[tokio::test]
async fn storage_error_terminates_stream() {
    let sqlite = SqliteStore::open_in_memory().unwrap();
    sqlite
        .conn()
        .execute(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES ('x', '', 1, 'bad')",
            [],
        )
        .unwrap();
    let store = Store::new(sqlite);

    let mut notes = store.all_notes();
    let first = timeout(WAIT, notes.next()).await.unwrap();
    assert!(matches!(first, Some(Err(StoreError::InvalidData(_)))));
    assert!(timeout(WAIT, notes.next()).await.unwrap().is_none());
}

#[tokio::test]
async fn stream_ends_when_store_is_dropped() {
    let store = Store::open_in_memory().unwrap();
    let mut notes = store.all_notes();
    snapshot(&mut notes).await;

    drop(store);
    assert!(timeout(WAIT, notes.next()).await.unwrap().is_none());
}

#[tokio::test]
async fn live_query_is_a_stream() {
    use futures::StreamExt;

    let store = Store::open_in_memory().unwrap();
    store.create_tag(Tag::new("one")).await.unwrap();
    let tags = store.all_tags();
    let first = timeout(WAIT, StreamExt::next(&mut tags.map(|r| r.map(|v| v.len()))))
        .await
        .unwrap();
    assert_eq!(first.unwrap().unwrap(), 1);
}

#[tokio::test]
async fn writes_bump_tracker_generations() {
    let store = Store::open_in_memory().unwrap();
    let before = store.changes().current();
    store.create_tag(Tag::new("x")).await.unwrap();
    let after = store.changes().current();
    assert!(after.changed_since(&before, &[Table::Tags]));
    assert!(!after.changed_since(&before, &[Table::Notes]));
}
