//! Error type shared by every store operation.

use crate::domain::{NoteId, TagId};
use rusqlite::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or link referenced a note that does not exist.
    #[error("note not found: {id}")]
    NoteNotFound { id: NoteId },

    /// An update or link referenced a tag that does not exist.
    #[error("tag not found: {id}")]
    TagNotFound { id: TagId },

    /// An update was given an entity that was never saved.
    #[error("{entity} has no id; it must be created before it can be updated")]
    MissingId { entity: &'static str },

    /// A uniqueness or foreign key constraint was violated.
    ///
    /// The ignore/no-op policies make this unreachable in normal use, so it
    /// points at a logic defect.
    #[error("constraint violated: {0}")]
    Constraint(#[source] rusqlite::Error),

    /// The database file could not be opened.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// A stored value could not be decoded.
    #[error("invalid data in database: {0}")]
    InvalidData(String),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A background storage task panicked or was cancelled.
    #[error("background storage task failed: {0}")]
    Background(String),
}

impl StoreError {
    /// Returns true for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoteNotFound { .. } | Self::TagNotFound { .. } | Self::MissingId { .. }
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..) = err
        {
            return Self::InvalidData(err.to_string());
        }
        // Open failures become StorageUnavailable in SqliteStore::open,
        // which knows the path.
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::Constraint(err),
            _ => Self::Database(err),
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Background(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
