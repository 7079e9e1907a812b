//! Shelf CLI - Command line interface for managing collections.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use shelf_collections::{
    ChangeOutcome, CollectionEvent, CollectionService, CollectionView, ShelfConfig,
    CONFIG_FILENAME,
};
use shelf_common::Error;
use shelf_storage::create_default_registry;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Manage named collections")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: <data dir>/shelf/shelf.json).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Provider to use, overriding the configuration.
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Root directory for the local provider, overriding the configuration.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file.
    Init,

    /// List all collections.
    List,

    /// Add a collection.
    Add {
        /// Collection title.
        title: String,

        /// Make the new collection the active one.
        #[arg(short, long)]
        active: bool,
    },

    /// Rename a collection.
    Rename {
        /// Collection id.
        id: String,

        /// New title.
        title: String,
    },

    /// Delete a collection.
    Delete {
        /// Collection id.
        id: String,
    },

    /// Make a collection the active one.
    Activate {
        /// Collection id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_data_dir()?.join(CONFIG_FILENAME),
    };

    if let Commands::Init = cli.command {
        return cmd_init(&config_path).await;
    }

    let config = resolve_config(&cli, &config_path).await?;
    let service = CollectionService::from_config(&create_default_registry(), &config)
        .context("Failed to select collection provider")?;
    echo_notifications(&service);

    match cli.command {
        Commands::Init => Ok(()),
        Commands::List => cmd_list(&service).await,
        Commands::Add { title, active } => {
            check_outcome(service.add(&title, active).await, "add")
        }
        Commands::Rename { id, title } => {
            check_outcome(service.edit(&CollectionView::with_id(id), &title).await, "rename")
        }
        Commands::Delete { id } => {
            check_flag(service.delete(&CollectionView::with_id(id)).await, "delete")
        }
        Commands::Activate { id } => {
            check_flag(service.activate(&CollectionView::with_id(id)).await, "activate")
        }
    }
}

/// Directory holding the default configuration and local data.
fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(base.join("shelf"))
}

/// Load the configuration file, falling back to a local provider next to
/// it, then apply command-line overrides.
async fn resolve_config(cli: &Cli, config_path: &Path) -> Result<ShelfConfig> {
    let mut config = match ShelfConfig::load(config_path).await {
        Ok(config) => config,
        Err(Error::NotFound(_)) => {
            debug!("No configuration at {}, using defaults", config_path.display());
            let data_dir = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            ShelfConfig::default_for(data_dir)
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read configuration {}", config_path.display())
            })
        }
    };

    if let Some(provider) = &cli.provider {
        config.provider = Some(provider.clone());
    }
    if let Some(root) = &cli.root {
        config.provider_config = serde_json::json!({ "root": root.to_string_lossy() });
    }

    Ok(config)
}

/// Print each change notification as it arrives.
fn echo_notifications(service: &CollectionService) {
    for event in CollectionEvent::ALL {
        let label = match event {
            CollectionEvent::Added => "added",
            CollectionEvent::Edited => "renamed",
            CollectionEvent::Deleted => "deleted",
            CollectionEvent::ActiveChanged => "activated",
        };
        service
            .notifier()
            .stream(event)
            .register(move |change| println!("{} {}", label, change.collection_id));
    }
}

/// Write a default configuration file.
async fn cmd_init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!("Configuration already exists: {}", config_path.display());
    }

    let data_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    ShelfConfig::default_for(&data_dir)
        .save(config_path)
        .await
        .context("Failed to write configuration")?;

    println!("Configuration written to {}", config_path.display());
    println!("  Provider: local");
    println!("  Data: {}", data_dir.display());

    Ok(())
}

/// List collections.
async fn cmd_list(service: &CollectionService) -> Result<()> {
    let collections = service.list_all().await;

    if collections.is_empty() {
        println!("No collections.");
    } else {
        for view in collections {
            let marker = if view.is_active { "*" } else { " " };
            println!("{} {}  {}", marker, view.id, view.title);
        }
    }

    Ok(())
}

fn check_outcome(outcome: ChangeOutcome, action: &str) -> Result<()> {
    if outcome.is_ok() {
        return Ok(());
    }
    match outcome {
        ChangeOutcome::Invalid => {
            anyhow::bail!("Cannot {}: the id and title must not be empty", action)
        }
        ChangeOutcome::Duplicate => {
            anyhow::bail!("Cannot {}: a collection with that title already exists", action)
        }
        _ => anyhow::bail!("Failed to {} collection", action),
    }
}

fn check_flag(succeeded: bool, action: &str) -> Result<()> {
    if !succeeded {
        anyhow::bail!("Failed to {} collection", action);
    }
    Ok(())
}
