use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_core::{storage::Database, AppConfig};

mod commands;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about = "A terminal reader for a personal blog's article API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// List article summaries
    List {
        /// Bypass the cache and fetch fresh summaries
        #[arg(short, long)]
        refresh: bool,
    },
    /// Print one article
    Show {
        /// Article id
        id: String,
    },
    /// Force a refresh of the summary cache
    Refresh,
    /// Show or set the persisted theme
    Theme {
        /// "dark", "light", or "toggle"; omit to show the current theme
        mode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize database
    let db = Arc::new(Database::new(&config).await?);

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config, db).await,
        Some(Commands::List { refresh }) => {
            let store = commands::open_store(&config, db.clone()).await?;
            commands::list::run(&store, refresh).await
        }
        Some(Commands::Show { id }) => {
            let store = commands::open_store(&config, db.clone()).await?;
            commands::show::run(&store, &id).await
        }
        Some(Commands::Refresh) => {
            let store = commands::open_store(&config, db.clone()).await?;
            commands::refresh::run(&store).await
        }
        Some(Commands::Theme { mode }) => commands::theme::run(&db, mode.as_deref()).await,
    }
}
