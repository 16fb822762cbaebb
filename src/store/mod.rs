//! Local SQLite store: one-shot operations and live queries

mod changes;
mod error;
mod handle;
mod live;
mod repository;
mod schema;
mod sqlite;

#[cfg(test)]
mod tests;

pub use changes::{ChangeTracker, Generations, Table};
pub use error::{StoreError, StoreResult};
pub use handle::Store;
pub use live::LiveQuery;
pub use repository::NoteRepository;
pub use schema::{SCHEMA_VERSION, create_schema, get_schema_version};
pub use sqlite::{SqliteStore, Transaction, TransactionMode};
