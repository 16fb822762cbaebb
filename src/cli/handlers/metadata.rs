//! Tag command handlers (tags, tag-new, tag-rm, tag, untag).

use anyhow::{Context, Result, bail};

use super::{ensure_tags, find_tag, truncate_str};
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat, TagListing};
use crate::cli::{TagArgs, TagNewArgs, TagRmArgs, TagsArgs, UntagArgs};
use crate::controller::NotesController;
use crate::domain::Tag;

pub async fn handle_tags(args: &TagsArgs, controller: &NotesController) -> Result<()> {
    let tags = controller
        .all_tags()
        .first()
        .await
        .context("failed to list tags")?;

    match args.format {
        OutputFormat::Human => {
            if tags.is_empty() {
                println!("No tags found.");
            } else {
                for t in &tags {
                    println!("{:<30}  {}", truncate_str(t.name(), 30), t.color());
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<TagListing> = tags.iter().map(TagListing::from).collect();
            println!("{}", Output::new(listings).to_json()?);
        }
    }
    Ok(())
}

pub async fn handle_tag_new(args: &TagNewArgs, controller: &NotesController, config: &Config) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("tag name cannot be empty");
    }
    if find_tag(controller, name).await?.is_some() {
        bail!("tag already exists: {name}");
    }

    let color = args.color.as_deref().unwrap_or(config.tag_color());
    let id = controller
        .insert_tag(Tag::with_color(name, color))
        .await?
        .with_context(|| format!("failed to create tag '{name}'"))?;
    println!("Created tag {id}: {name}");
    Ok(())
}

pub async fn handle_tag_rm(args: &TagRmArgs, controller: &NotesController) -> Result<()> {
    let Some(tag) = find_tag(controller, &args.name).await? else {
        bail!("tag not found: {}", args.name);
    };
    controller
        .delete_tag(tag)
        .await?
        .with_context(|| format!("failed to delete tag '{}'", args.name))?;
    println!("Deleted tag {}", args.name);
    Ok(())
}

pub async fn handle_tag(args: &TagArgs, controller: &NotesController, config: &Config) -> Result<()> {
    let tags = ensure_tags(controller, std::slice::from_ref(&args.tag), config.tag_color()).await?;
    let Some(tag_id) = tags.first().and_then(Tag::id) else {
        bail!("tag '{}' could not be resolved", args.tag);
    };

    controller
        .add_tag_to_note(args.note, tag_id)
        .await?
        .with_context(|| format!("failed to tag note {}", args.note))?;
    println!("Tagged note {} with {}", args.note, args.tag.trim());
    Ok(())
}

pub async fn handle_untag(args: &UntagArgs, controller: &NotesController) -> Result<()> {
    let Some(tag_id) = find_tag(controller, &args.tag).await?.and_then(|t| t.id()) else {
        bail!("tag not found: {}", args.tag);
    };

    controller
        .remove_tag_from_note(args.note, tag_id)
        .await?
        .with_context(|| format!("failed to untag note {}", args.note))?;
    println!("Removed tag {} from note {}", args.tag, args.note);
    Ok(())
}
