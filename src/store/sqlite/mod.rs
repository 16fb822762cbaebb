//! SQLite-backed notes store implementation.

mod connection;
mod repo_impl;
mod row;
mod transaction;


use rusqlite::Connection;

pub use transaction::{Transaction, TransactionMode};

// ===========================================
// SqliteStore Struct
// ===========================================

/// SQLite-backed notes store.
///
/// Owns the database connection. All access is synchronous; the async
/// [`Store`](crate::store::Store) handle runs these calls on the blocking pool.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}
