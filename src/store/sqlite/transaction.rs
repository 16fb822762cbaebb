//! RAII-based transaction support for SQLite.

use crate::store::StoreResult;
use rusqlite::{Connection, Params};

/// How a transaction acquires its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Snapshot reads; the lock is taken on the first read.
    Read,
    /// Takes the write lock immediately.
    Write,
}

impl TransactionMode {
    fn begin_sql(self) -> &'static str {
        match self {
            Self::Read => "BEGIN DEFERRED",
            Self::Write => "BEGIN IMMEDIATE",
        }
    }
}

/// A database transaction with RAII-based automatic rollback.
///
/// The transaction will automatically rollback when dropped unless
/// `commit()` is called explicitly.
pub struct Transaction<'a> {
    conn: &'a Connection,
    mode: TransactionMode,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Begins a transaction on the given connection.
    pub(crate) fn begin(conn: &'a Connection, mode: TransactionMode) -> StoreResult<Self> {
        conn.execute_batch(mode.begin_sql())?;
        Ok(Self {
            conn,
            mode,
            finished: false,
        })
    }

    /// Returns the mode the transaction was started in.
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Executes a SQL statement within the transaction.
    ///
    /// Returns the number of rows changed.
    pub fn execute(&self, sql: &str, params: impl Params) -> StoreResult<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Commits the transaction.
    pub fn commit(mut self) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }

    /// Rolls back the transaction explicitly.
    pub fn rollback(mut self) -> StoreResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished
            && let Err(err) = self.conn.execute_batch("ROLLBACK")
        {
            tracing::warn!(error = %err, "rollback on drop failed");
        }
    }
}
