//! Command handlers for the CLI.

mod list;
mod metadata;
mod notes;


use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::cli::output::{NoteListing, Output, OutputFormat, format_timestamp};
use crate::cli::{Cli, CompletionsArgs};
use crate::controller::NotesController;
use crate::domain::{Note, Tag};

// Re-export public items
pub use list::{handle_categories, handle_list, handle_search, handle_watch};
pub use metadata::{handle_tag, handle_tag_new, handle_tag_rm, handle_tags, handle_untag};
pub use notes::{handle_clear, handle_edit, handle_new, handle_rm, handle_show};

pub fn handle_completions(args: &CompletionsArgs) {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "notebox",
        &mut std::io::stdout(),
    );
}

// ===========================================
// Shared Utilities
// ===========================================

/// Looks up a tag by exact name.
///
/// Names are not unique in storage; the first match in name order wins.
pub(crate) async fn find_tag(controller: &NotesController, name: &str) -> Result<Option<Tag>> {
    let tags = controller
        .all_tags()
        .first()
        .await
        .context("failed to list tags")?;
    Ok(tags.into_iter().find(|t| t.name() == name))
}

/// Looks up each tag by name, creating the missing ones with `color`.
pub(crate) async fn ensure_tags(
    controller: &NotesController,
    names: &[String],
    color: &str,
) -> Result<Vec<Tag>> {
    let mut existing = controller
        .all_tags()
        .first()
        .await
        .context("failed to list tags")?;

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("tag name cannot be empty");
        }
        if let Some(tag) = existing.iter().find(|t| t.name() == name) {
            resolved.push(tag.clone());
            continue;
        }
        let id = controller
            .insert_tag(Tag::with_color(name, color))
            .await?
            .with_context(|| format!("failed to create tag '{name}'"))?;
        tracing::info!(tag = name, %id, "created tag");
        let tag = Tag::with_color(name, color).with_id(id);
        existing.push(tag.clone());
        resolved.push(tag);
    }
    Ok(resolved)
}

/// Prints a note list in the requested format.
pub(crate) fn print_notes(notes: &[Note], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
                return Ok(());
            }
            println!("{:<6}  {:<40}  {:<15}  {:>16}", "ID", "Title", "Category", "Updated");
            println!(
                "{:<6}  {:<40}  {:<15}  {:>16}",
                "------",
                "----------------------------------------",
                "---------------",
                "----------------"
            );
            for note in notes {
                let id = note.id().map(|id| id.to_string()).unwrap_or_default();
                println!(
                    "{:<6}  {:<40}  {:<15}  {:>16}",
                    id,
                    truncate_str(note.title(), 40),
                    truncate_str(note.category(), 15),
                    format_timestamp(note.updated_at())
                );
            }
            println!();
            println!("{} note(s)", notes.len());
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            println!("{}", Output::new(listings).to_json()?);
        }
    }
    Ok(())
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
