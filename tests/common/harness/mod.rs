//! Test harness for CLI integration tests.
//!
//! Provides isolated databases, programmatic note seeding,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod note;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::NoteboxCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use note::TestNote;
