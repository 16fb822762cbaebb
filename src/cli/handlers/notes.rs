//! Single-note command handlers (new, edit, rm, clear, show).

use anyhow::{Context, Result, bail};

use super::ensure_tags;
use crate::cli::config::Config;
use crate::cli::output::{NoteDetail, Output, OutputFormat, format_timestamp};
use crate::cli::{ClearArgs, EditArgs, NewArgs, RmArgs, ShowArgs};
use crate::controller::NotesController;
use crate::domain::{Note, NoteId};

pub async fn handle_new(args: &NewArgs, controller: &NotesController, config: &Config) -> Result<()> {
    let title = args.title.trim();
    if title.is_empty() {
        bail!("title cannot be empty");
    }

    let note = Note::builder(title, args.content.as_str())
        .category(args.category.trim())
        .build();

    let saved = if args.tags.is_empty() {
        controller.insert(note).await?
    } else {
        let tags = ensure_tags(controller, &args.tags, config.tag_color()).await?;
        controller.save_note_with_tags(note, tags).await?
    };
    let id = saved.context("failed to save note")?;

    println!("Created note {id}: {title}");
    Ok(())
}

pub async fn handle_edit(args: &EditArgs, controller: &NotesController, config: &Config) -> Result<()> {
    let retag = args.clear_tags || !args.tags.is_empty();
    if args.title.is_none() && args.content.is_none() && args.category.is_none() && !retag {
        bail!("nothing to change; pass --title, --content, --category, --tag, or --clear-tags");
    }

    let mut note = load_note(controller, args.note).await?;
    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            bail!("title cannot be empty");
        }
        note.set_title(title);
    }
    if let Some(content) = &args.content {
        note.set_content(content.as_str());
    }
    if let Some(category) = &args.category {
        note.set_category(category.trim());
    }

    let saved = if retag {
        let tags = ensure_tags(controller, &args.tags, config.tag_color()).await?;
        controller.save_note_with_tags(note, tags).await?
    } else {
        controller.update(note).await?.map(|()| args.note)
    };
    saved.with_context(|| format!("failed to update note {}", args.note))?;

    println!("Updated note {}", args.note);
    Ok(())
}

pub async fn handle_rm(args: &RmArgs, controller: &NotesController) -> Result<()> {
    let note = load_note(controller, args.note).await?;
    let title = note.title().to_string();
    controller
        .delete(note)
        .await?
        .with_context(|| format!("failed to delete note {}", args.note))?;
    println!("Deleted note {}: {title}", args.note);
    Ok(())
}

pub async fn handle_clear(args: &ClearArgs, controller: &NotesController) -> Result<()> {
    if !args.yes {
        bail!("refusing to delete every note without --yes");
    }
    let removed = controller
        .delete_all()
        .await?
        .context("failed to delete notes")?;
    println!("Deleted {removed} note(s)");
    Ok(())
}

pub async fn handle_show(args: &ShowArgs, controller: &NotesController) -> Result<()> {
    let item = controller
        .get_note_with_tags(args.note)
        .await
        .with_context(|| format!("failed to load note {}", args.note))?
        .with_context(|| format!("note not found: {}", args.note))?;

    match args.format {
        OutputFormat::Human => {
            let note = item.note();
            println!("{}", note.title());
            if !note.category().is_empty() {
                println!("Category: {}", note.category());
            }
            if !item.tags().is_empty() {
                let names: Vec<&str> = item.tags().iter().map(|t| t.name()).collect();
                println!("Tags:     {}", names.join(", "));
            }
            println!("Created:  {}", format_timestamp(note.created_at()));
            println!("Updated:  {}", format_timestamp(note.updated_at()));
            if !note.content().is_empty() {
                println!();
                println!("{}", note.content());
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(NoteDetail::from(&item)).to_json()?);
        }
    }
    Ok(())
}

async fn load_note(controller: &NotesController, id: NoteId) -> Result<Note> {
    controller
        .get_note_by_id(id)
        .await
        .with_context(|| format!("failed to load note {id}"))?
        .with_context(|| format!("note not found: {id}"))
}
