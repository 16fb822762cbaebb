//! Isolated test environment with a temporary database.

// Test utility; not every helper is used by every test binary
#![allow(dead_code)]

use super::{NoteboxCommand, TestNote};
use notebox::domain::{NoteId, Tag, TagId};
use notebox::store::Store;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary database file.
///
/// Every command built from it uses its own database and config path, so
/// the user's files are never read. The directory is removed on drop.
pub struct TestEnv {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the temp directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the database path used by [`cmd`](Self::cmd).
    pub fn db_path(&self) -> PathBuf {
        self.root.join("data").join("notes.db")
    }

    /// Returns the config path used by [`cmd`](Self::cmd).
    ///
    /// The file does not exist until [`write_config`](Self::write_config).
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Writes the config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).expect("Failed to write config");
    }

    /// Inserts a note (and its tags) directly through the store.
    pub fn add_note(&self, test_note: &TestNote) -> NoteId {
        self.block_on(|store| async move {
            let id = store.create_note(test_note.to_note()).await.unwrap();
            for name in test_note.tag_names() {
                let tag_id = find_or_create_tag(&store, name).await;
                store.add_tag_to_note(id, tag_id).await.unwrap();
            }
            id
        })
    }

    /// Inserts a tag directly through the store.
    pub fn add_tag(&self, name: &str) -> TagId {
        self.block_on(|store| async move { find_or_create_tag(&store, name).await })
    }

    /// Opens the database and runs `f` against it on a private runtime.
    pub fn block_on<F, Fut, R>(&self, f: F) -> R
    where
        F: FnOnce(Store) -> Fut,
        Fut: Future<Output = R>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        runtime.block_on(async {
            let store = Store::open(self.db_path()).await.expect("Failed to open store");
            f(store).await
        })
    }

    /// Creates a NoteboxCommand configured for this test environment.
    pub fn cmd(&self) -> NoteboxCommand {
        NoteboxCommand::new()
            .config(&self.config_path())
            .db(&self.db_path())
    }

    /// Creates a NoteboxCommand that relies on the config file for the database.
    pub fn cmd_without_db(&self) -> NoteboxCommand {
        NoteboxCommand::new().config(&self.config_path())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

async fn find_or_create_tag(store: &Store, name: &str) -> TagId {
    let existing = store.all_tags().first().await.unwrap();
    if let Some(id) = existing.iter().find(|t| t.name() == name).and_then(Tag::id) {
        return id;
    }
    store.create_tag(Tag::new(name)).await.unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_add_note_creates_db() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("Seeded"));
        assert!(env.db_path().exists(), "database should be created");
    }

    #[test]
    fn test_env_add_note_links_tags() {
        let env = TestEnv::new();
        let id = env.add_note(&TestNote::new("Tagged").tag("a").tag("b"));
        let again = env.add_note(&TestNote::new("Also tagged").tag("a"));
        assert_ne!(id, again);

        let tags = env.block_on(|store| async move {
            store.get_note_with_tags(id).await.unwrap().unwrap().tags().len()
        });
        assert_eq!(tags, 2);
        let all = env.block_on(|store| async move { store.all_tags().first().await.unwrap().len() });
        assert_eq!(all, 2);
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }
}
