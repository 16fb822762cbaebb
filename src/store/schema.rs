//! SQLite schema creation for the notes store.

use rusqlite::Connection;

/// Current schema version recorded in `schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the database schema for the notes store.
///
/// This function creates all required tables, indexes, and constraints.
/// It is idempotent - calling it multiple times is safe.
///
/// # Tables Created
/// - `notes` - Note rows with epoch-millisecond timestamps
/// - `tags` - Named, colored labels
/// - `note_tag_cross_ref` - Many-to-many junction for notes and tags
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#6200EE'
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS note_tag_cross_ref (
            note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (note_id, tag_id)
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes(updated_at);
         CREATE INDEX IF NOT EXISTS idx_notes_category ON notes(category);
         CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
         CREATE INDEX IF NOT EXISTS idx_note_tag_cross_ref_tag ON note_tag_cross_ref(tag_id);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}
