//! Connection management for SqliteStore.

use super::SqliteStore;
use super::transaction::{Transaction, TransactionMode};
use crate::store::{StoreError, StoreResult, create_schema};
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use std::fs;
use std::path::Path;

/// Name of the SQL function used for case-insensitive substring search.
pub(crate) const CONTAINS_FN: &str = "contains_ci";

/// Enables foreign keys, registers search functions, and creates the schema.
fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.create_scalar_function(
        CONTAINS_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<String>(0)?;
            let needle = ctx.get::<String>(1)?;
            Ok(contains_ignore_case(&haystack, &needle))
        },
    )?;
    create_schema(conn)
}

/// Unicode-aware case-insensitive substring test. The empty needle matches.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl SqliteStore {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory SQLite database with the notes schema.
    ///
    /// This is useful for testing and for sessions that don't need persistence.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the schema
    /// if this is a new database. Any failure to open or initialize the file
    /// is reported as [`StoreError::StorageUnavailable`].
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let unavailable = |source: rusqlite::Error| StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        configure(&conn).map_err(unavailable)?;
        tracing::debug!(path = %path.display(), "opened notes database");
        Ok(Self { conn })
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a new transaction.
    ///
    /// The transaction will automatically rollback on drop unless `commit()` is called.
    pub fn transaction(&self, mode: TransactionMode) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&self.conn, mode)
    }
}
