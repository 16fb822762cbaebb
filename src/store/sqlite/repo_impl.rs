//! NoteRepository trait implementation for SqliteStore.

use super::SqliteStore;
use super::connection::CONTAINS_FN;
use super::row::{NOTE_COLUMNS, NOTE_COLUMNS_N, TAG_COLUMNS, note_from_row, tag_from_row, to_millis};
use super::transaction::TransactionMode;
use crate::domain::{Note, NoteId, NoteTagCrossRef, NoteWithTags, Tag, TagId};
use crate::store::{NoteRepository, StoreError, StoreResult};
use rusqlite::{OptionalExtension, Params, params};
use std::collections::HashMap;

impl SqliteStore {
    /// Runs a note query and collects every row, surfacing the first bad row.
    fn query_notes(&self, sql: &str, params: impl Params) -> StoreResult<Vec<Note>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let notes = stmt
            .query_map(params, |row| note_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn search_sql() -> String {
        format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE {CONTAINS_FN}(title, ?1) OR {CONTAINS_FN}(content, ?1)
             ORDER BY updated_at DESC, id DESC"
        )
    }

    fn note_exists(&self, id: NoteId) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM notes WHERE id = ?", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn tag_exists(&self, id: TagId) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM tags WHERE id = ?", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Tags of one note, ordered by name.
    fn tags_for_note(&self, id: NoteId) -> StoreResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT t.id, t.name, t.color FROM tags t
             JOIN note_tag_cross_ref x ON t.id = x.tag_id
             WHERE x.note_id = ?
             ORDER BY t.name ASC, t.id ASC",
        )?;
        let tags = stmt
            .query_map([id], |row| tag_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Pairs each note with its tags using a single pass over the junction.
    ///
    /// Must be called inside a read transaction so notes and links come from
    /// the same snapshot.
    fn attach_tags(&self, notes: Vec<Note>) -> StoreResult<Vec<NoteWithTags>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT x.note_id, t.id, t.name, t.color FROM note_tag_cross_ref x
             JOIN tags t ON t.id = x.tag_id
             ORDER BY t.name ASC, t.id ASC",
        )?;
        let mut by_note: HashMap<NoteId, Vec<Tag>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, NoteId>(0)?, tag_from_row(row, 1)?))
        })?;
        for row in rows {
            let (note_id, tag) = row?;
            by_note.entry(note_id).or_default().push(tag);
        }

        Ok(notes
            .into_iter()
            .map(|note| {
                let tags = note
                    .id()
                    .and_then(|id| by_note.remove(&id))
                    .unwrap_or_default();
                NoteWithTags::new(note, tags)
            })
            .collect())
    }
}

impl NoteRepository for SqliteStore {
    // ===========================================
    // Notes
    // ===========================================

    fn insert_note(&mut self, note: &Note) -> StoreResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (title, content, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.title(),
                note.content(),
                note.category(),
                to_millis(note.created_at()),
                to_millis(note.updated_at()),
            ],
        )?;
        Ok(NoteId::new(self.conn.last_insert_rowid()))
    }

    fn update_note(&mut self, note: &Note) -> StoreResult<()> {
        let id = note.id().ok_or(StoreError::MissingId { entity: "note" })?;
        let rows = self.conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, category = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                note.title(),
                note.content(),
                note.category(),
                to_millis(note.updated_at()),
                id,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::NoteNotFound { id });
        }
        Ok(())
    }

    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool> {
        let tx = self.transaction(TransactionMode::Write)?;
        tx.execute("DELETE FROM note_tag_cross_ref WHERE note_id = ?", [id])?;
        let rows = tx.execute("DELETE FROM notes WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn delete_all_notes(&mut self) -> StoreResult<usize> {
        let tx = self.transaction(TransactionMode::Write)?;
        tx.execute("DELETE FROM note_tag_cross_ref", [])?;
        let rows = tx.execute("DELETE FROM notes", [])?;
        tx.commit()?;
        Ok(rows)
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
                [id],
                |row| note_from_row(row, 0),
            )
            .optional()?;
        Ok(note)
    }

    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        self.query_notes(
            &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id DESC"),
            [],
        )
    }

    fn search_notes(&self, query: &str) -> StoreResult<Vec<Note>> {
        self.query_notes(&Self::search_sql(), [query])
    }

    fn notes_by_category(&self, category: &str) -> StoreResult<Vec<Note>> {
        self.query_notes(
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE category = ?
                 ORDER BY updated_at DESC, id DESC"
            ),
            [category],
        )
    }

    fn categories(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT DISTINCT category FROM notes WHERE category != '' ORDER BY category ASC",
        )?;
        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    // ===========================================
    // Tags
    // ===========================================

    fn insert_tag(&mut self, tag: &Tag) -> StoreResult<TagId> {
        match tag.id() {
            // Upsert in place: a REPLACE would delete the row and cascade its links.
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO tags (id, name, color) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                         name = excluded.name,
                         color = excluded.color",
                    params![id, tag.name(), tag.color()],
                )?;
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO tags (name, color) VALUES (?1, ?2)",
                    params![tag.name(), tag.color()],
                )?;
                Ok(TagId::new(self.conn.last_insert_rowid()))
            }
        }
    }

    fn update_tag(&mut self, tag: &Tag) -> StoreResult<()> {
        let id = tag.id().ok_or(StoreError::MissingId { entity: "tag" })?;
        let rows = self.conn.execute(
            "UPDATE tags SET name = ?1, color = ?2 WHERE id = ?3",
            params![tag.name(), tag.color(), id],
        )?;
        if rows == 0 {
            return Err(StoreError::TagNotFound { id });
        }
        Ok(())
    }

    fn delete_tag(&mut self, id: TagId) -> StoreResult<bool> {
        let tx = self.transaction(TransactionMode::Write)?;
        tx.execute("DELETE FROM note_tag_cross_ref WHERE tag_id = ?", [id])?;
        let rows = tx.execute("DELETE FROM tags WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn get_tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                &format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?"),
                [id],
                |row| tag_from_row(row, 0),
            )
            .optional()?;
        Ok(tag)
    }

    fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name ASC, id ASC"))?;
        let tags = stmt
            .query_map([], |row| tag_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    // ===========================================
    // Note-Tag Links
    // ===========================================

    fn insert_cross_ref(&mut self, cross_ref: NoteTagCrossRef) -> StoreResult<bool> {
        let tx = self.transaction(TransactionMode::Write)?;
        if !self.note_exists(cross_ref.note_id)? {
            return Err(StoreError::NoteNotFound {
                id: cross_ref.note_id,
            });
        }
        if !self.tag_exists(cross_ref.tag_id)? {
            return Err(StoreError::TagNotFound {
                id: cross_ref.tag_id,
            });
        }
        let rows = tx.execute(
            "INSERT OR IGNORE INTO note_tag_cross_ref (note_id, tag_id) VALUES (?1, ?2)",
            params![cross_ref.note_id, cross_ref.tag_id],
        )?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn delete_cross_ref(&mut self, cross_ref: NoteTagCrossRef) -> StoreResult<bool> {
        let rows = self.conn.execute(
            "DELETE FROM note_tag_cross_ref WHERE note_id = ?1 AND tag_id = ?2",
            params![cross_ref.note_id, cross_ref.tag_id],
        )?;
        Ok(rows > 0)
    }

    // ===========================================
    // Joined Reads
    // ===========================================

    fn get_note_with_tags(&self, id: NoteId) -> StoreResult<Option<NoteWithTags>> {
        let tx = self.transaction(TransactionMode::Read)?;
        let result = match self.get_note(id)? {
            Some(note) => Some(NoteWithTags::new(note, self.tags_for_note(id)?)),
            None => None,
        };
        tx.commit()?;
        Ok(result)
    }

    fn list_notes_with_tags(&self) -> StoreResult<Vec<NoteWithTags>> {
        let tx = self.transaction(TransactionMode::Read)?;
        let notes = self.query_notes(
            &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, id DESC"),
            [],
        )?;
        let result = self.attach_tags(notes)?;
        tx.commit()?;
        Ok(result)
    }

    fn search_notes_with_tags(&self, query: &str) -> StoreResult<Vec<NoteWithTags>> {
        let tx = self.transaction(TransactionMode::Read)?;
        let notes = self.search_notes(query)?;
        let result = self.attach_tags(notes)?;
        tx.commit()?;
        Ok(result)
    }

    fn notes_with_tag(&self, tag_id: TagId) -> StoreResult<Vec<Note>> {
        self.query_notes(
            &format!(
                "SELECT {NOTE_COLUMNS_N} FROM notes n
                 JOIN note_tag_cross_ref x ON n.id = x.note_id
                 WHERE x.tag_id = ?
                 ORDER BY n.updated_at DESC, n.id DESC"
            ),
            [tag_id],
        )
    }
}
