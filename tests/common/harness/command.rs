//! Fluent wrapper around assert_cmd::Command.

// Test utility; not every helper is used by every test binary
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `notebox` binary.
pub struct NoteboxCommand {
    args: Vec<String>,
    config: Option<PathBuf>,
}

impl NoteboxCommand {
    /// Creates a new command for the `notebox` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config: None,
        }
    }

    /// Sets the `--db` option.
    pub fn db(mut self, path: &Path) -> Self {
        self.args.push("--db".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points the binary at a config file instead of the user's.
    pub fn config(mut self, path: &Path) -> Self {
        self.config = Some(path.to_path_buf());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("notebox").expect("Failed to find notebox binary");
        cmd.env_remove("RUST_LOG");
        if let Some(config) = &self.config {
            cmd.env("NOTEBOX_CONFIG", config);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Configures for the `search` command with a query.
    pub fn search(self, query: &str) -> Self {
        self.args(["search", query])
    }

    /// Configures for the `show` command with an ID.
    pub fn show(self, id: impl ToString) -> Self {
        self.args(["show".to_string(), id.to_string()])
    }

    /// Configures for the `tags` command.
    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    /// Configures for the `categories` command.
    pub fn categories(self) -> Self {
        self.args(["categories"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NoteboxCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        NoteboxCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_db() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.db");
        let cmd = NoteboxCommand::new().db(&db);
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], db.to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = NoteboxCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"ls".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}
