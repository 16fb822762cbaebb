//! notebox - local notes with categories, tags, and live search

pub mod cli;
pub mod controller;
pub mod domain;
pub mod store;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_categories, handle_clear, handle_completions, handle_edit, handle_list,
        handle_new, handle_rm, handle_search, handle_show, handle_tag, handle_tag_new,
        handle_tag_rm, handle_tags, handle_untag, handle_watch,
    },
};
use controller::NotesController;
use store::Store;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for the CLI application.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    if let Command::Completions(args) = &cli.command {
        handle_completions(args);
        return Ok(());
    }

    let db_path = config.database_path(cli.db.as_ref());
    tracing::debug!(path = %db_path.display(), "opening note store");
    let store = Store::open(db_path.clone())
        .await
        .with_context(|| format!("failed to open notes database at {}", db_path.display()))?;
    let controller = NotesController::new(store);

    match &cli.command {
        Command::New(args) => handle_new(args, &controller, &config).await,
        Command::Edit(args) => handle_edit(args, &controller, &config).await,
        Command::Rm(args) => handle_rm(args, &controller).await,
        Command::Clear(args) => handle_clear(args, &controller).await,
        Command::Show(args) => handle_show(args, &controller).await,
        Command::List(args) => handle_list(args, &controller).await,
        Command::Search(args) => handle_search(args, &controller).await,
        Command::Categories(args) => handle_categories(args, &controller).await,
        Command::Tags(args) => handle_tags(args, &controller).await,
        Command::TagNew(args) => handle_tag_new(args, &controller, &config).await,
        Command::TagRm(args) => handle_tag_rm(args, &controller).await,
        Command::Tag(args) => handle_tag(args, &controller, &config).await,
        Command::Untag(args) => handle_untag(args, &controller).await,
        Command::Watch(args) => handle_watch(args, &controller).await,
        Command::Completions(_) => Ok(()),
    }
}
