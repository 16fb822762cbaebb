//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::NoteId;
use output::OutputFormat;

/// notebox - local notes with categories, tags, and live search
#[derive(Parser, Debug)]
#[command(name = "notebox", version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new note
    New(NewArgs),

    /// Change a note's title, content, category, or tags
    Edit(EditArgs),

    /// Delete a note
    Rm(RmArgs),

    /// Delete every note
    Clear(ClearArgs),

    /// Show a note with its tags
    Show(ShowArgs),

    /// List notes (newest first; by last edit when filtered)
    #[command(name = "ls")]
    List(ListArgs),

    /// Case-insensitive search over titles and content
    Search(SearchArgs),

    /// List the categories in use
    Categories(CategoriesArgs),

    /// List all tags
    Tags(TagsArgs),

    /// Create a tag
    #[command(name = "tag-new")]
    TagNew(TagNewArgs),

    /// Delete a tag and detach it from every note
    #[command(name = "tag-rm")]
    TagRm(TagRmArgs),

    /// Add a tag to a note
    Tag(TagArgs),

    /// Remove a tag from a note
    Untag(UntagArgs),

    /// Print the matching notes, then again after every change
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title
    pub title: String,

    /// Note body
    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Category for the note
    #[arg(short = 'C', long, default_value = "")]
    pub category: String,

    /// Tag name (can be specified multiple times; missing tags are created)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID
    pub note: NoteId,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New body
    #[arg(short, long)]
    pub content: Option<String>,

    /// New category (empty string clears it)
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Tag name (replaces all tags, can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Remove all tags from the note
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID
    pub note: NoteId,
}

/// Arguments for the `clear` command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Confirm deleting every note
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID
    pub note: NoteId,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list notes in this category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Only list notes carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search text (matched literally, ignoring case)
    pub query: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `categories` command
#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tag-new` command
#[derive(Parser, Debug)]
pub struct TagNewArgs {
    /// Tag name
    pub name: String,

    /// Display color such as "#FF5722" (defaults to the configured color)
    #[arg(long)]
    pub color: Option<String>,
}

/// Arguments for the `tag-rm` command
#[derive(Parser, Debug)]
pub struct TagRmArgs {
    /// Tag name
    pub name: String,
}

/// Arguments for the `tag` command (add tag to note)
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Note ID
    pub note: NoteId,

    /// Tag to add (created if missing)
    pub tag: String,
}

/// Arguments for the `untag` command (remove tag from note)
#[derive(Parser, Debug)]
pub struct UntagArgs {
    /// Note ID
    pub note: NoteId,

    /// Tag to remove
    pub tag: String,
}

/// Arguments for the `watch` command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Search text; takes precedence over --category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category to follow
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Exit after this many snapshots
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
