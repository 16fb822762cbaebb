//! Listing command handlers (ls, search, categories, watch).

use anyhow::{Context, Result};

use super::{find_tag, print_notes};
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::{CategoriesArgs, ListArgs, SearchArgs, WatchArgs};
use crate::controller::NotesController;

pub async fn handle_list(args: &ListArgs, controller: &NotesController) -> Result<()> {
    let notes = if let Some(tag_name) = &args.tag {
        let Some(tag) = find_tag(controller, tag_name).await? else {
            print_notes(&[], args.format)?;
            return Ok(());
        };
        let Some(tag_id) = tag.id() else {
            anyhow::bail!("tag '{tag_name}' has no id");
        };
        let mut notes = controller
            .notes_with_tag(tag_id)
            .first()
            .await
            .with_context(|| format!("failed to list notes tagged '{tag_name}'"))?;
        if let Some(category) = &args.category {
            notes.retain(|n| n.category() == category);
        }
        notes
    } else {
        controller.filter_by_category(args.category.clone());
        controller
            .active_notes()
            .first()
            .await
            .context("failed to list notes")?
    };

    print_notes(&notes, args.format)
}

pub async fn handle_search(args: &SearchArgs, controller: &NotesController) -> Result<()> {
    controller.update_search_query(args.query.as_str());
    let notes = controller
        .active_notes()
        .first()
        .await
        .with_context(|| format!("failed to search for '{}'", args.query))?;
    print_notes(&notes, args.format)
}

pub async fn handle_categories(args: &CategoriesArgs, controller: &NotesController) -> Result<()> {
    let categories = controller
        .all_categories()
        .first()
        .await
        .context("failed to list categories")?;

    match args.format {
        OutputFormat::Human => {
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                for c in &categories {
                    println!("{c}");
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(categories).to_json()?);
        }
    }
    Ok(())
}

/// Prints the active note list and reprints it on every change until
/// interrupted or `--count` snapshots have been shown.
pub async fn handle_watch(args: &WatchArgs, controller: &NotesController) -> Result<()> {
    if let Some(search) = &args.search {
        controller.update_search_query(search.as_str());
    }
    controller.filter_by_category(args.category.clone());

    let mut notes = controller.active_notes();
    let mut shown = 0usize;
    loop {
        if args.count.is_some_and(|limit| shown >= limit) {
            break;
        }
        tokio::select! {
            item = notes.next() => {
                let Some(result) = item else {
                    break;
                };
                let snapshot = result.context("live note query failed")?;
                match args.format {
                    OutputFormat::Human => {
                        if shown > 0 {
                            println!();
                        }
                        print_notes(&snapshot, OutputFormat::Human)?;
                    }
                    OutputFormat::Json => {
                        let listings: Vec<NoteListing> =
                            snapshot.iter().map(NoteListing::from).collect();
                        println!("{}", serde_json::to_string(&Output::new(listings))?);
                    }
                }
                shown += 1;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for interrupt")?;
                tracing::debug!(shown, "watch interrupted");
                break;
            }
        }
    }
    Ok(())
}
