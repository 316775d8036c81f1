//! Command line front end for marksync.
//!
//! Stands in for the browser glue: a JSON file plays the native bookmark
//! tree, a SQLite file under the data directory is the local store.
//!
//! ```text
//! marksync import --tree bookmarks.json
//! marksync sync --tree bookmarks.json
//! marksync remove --tree bookmarks.json <ID>
//! marksync list [--all]
//! marksync config show | set-url <URL> | reset-store
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use marksync::database::Database;
use marksync::events::BookmarkEvent;
use marksync::managers::local_store::{LocalStore, LocalStoreTrait};
use marksync::managers::memory_tree::MemoryTree;
use marksync::services::native_tree::NativeTree;
use marksync::services::remote_store::HttpRemoteStore;
use marksync::services::sync_engine::SyncEngine;

const DATA_DIR_ENV: &str = "MARKSYNC_DATA_DIR";
const API_URL_ENV: &str = "MARKSYNC_API_URL";

/// Keeps browser bookmarks in sync with a shared remote store.
#[derive(Parser, Debug)]
#[command(name = "marksync", version)]
struct Cli {
    /// Directory holding marksync.db (default: $MARKSYNC_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Give up on remote store requests after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the tree file into the local store
    Import {
        #[arg(long)]
        tree: PathBuf,
    },
    /// Sync the local store with the remote store and apply remote changes to the tree file
    Sync {
        #[arg(long)]
        tree: PathBuf,
        /// Skip the re-import that follows native removals
        #[arg(long)]
        no_reimport: bool,
    },
    /// Remove a bookmark from the tree file and propagate the deletion
    Remove {
        #[arg(long)]
        tree: PathBuf,
        id: String,
    },
    /// Print the locally stored bookmarks
    List {
        /// Include tombstones
        #[arg(long)]
        all: bool,
    },
    /// Show or change the sync configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    Show,
    SetUrl { url: String },
    /// Forget the store id; the next sync creates a new store
    ResetStore,
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "marksync=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marksync: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(cli.data_dir);
    let db = Arc::new(Database::open_in_dir(&data_dir)?);
    let store = LocalStore::new(db);

    match cli.command {
        Command::Import { tree } => {
            let engine = build_engine(store, &tree, cli.timeout_secs)?;
            let outcome = engine.import_bookmarks().await?;
            print_json(&outcome.stats)?;
        }
        Command::Sync { tree, no_reimport } => {
            let engine = build_engine(store, &tree, cli.timeout_secs)?.with_reimport_after_delete(!no_reimport);
            let outcome = engine.sync_bookmarks().await;
            engine.tree().save(&tree)?;
            print_json(&outcome?)?;
        }
        Command::Remove { tree, id } => {
            let engine = build_engine(store, &tree, cli.timeout_secs)?;
            engine.tree().remove(&id).await?;
            engine.tree().save(&tree)?;
            let outcome = engine.handle_event(BookmarkEvent::Removed { id }).await;
            engine.tree().save(&tree)?;
            print_json(&outcome?)?;
        }
        Command::List { all } => {
            let bookmarks: Vec<_> = store
                .get_bookmarks()?
                .into_iter()
                .filter(|b| all || !b.deleted)
                .collect();
            print_json(&bookmarks)?;
        }
        Command::Config { cmd } => match cmd {
            ConfigCmd::Show => print_json(&store.get_config()?)?,
            ConfigCmd::SetUrl { url } => store.set_api_url(&url)?,
            ConfigCmd::ResetStore => store.clear_store_id()?,
        },
    }
    Ok(())
}

fn build_engine(
    store: LocalStore,
    tree_path: &Path,
    timeout_secs: Option<u64>,
) -> Result<SyncEngine<HttpRemoteStore, MemoryTree>, Box<dyn std::error::Error>> {
    let tree = MemoryTree::load(tree_path)?;
    let remote = match timeout_secs {
        Some(secs) => HttpRemoteStore::with_timeout(Duration::from_secs(secs))?,
        None => HttpRemoteStore::new()?,
    };
    let engine = SyncEngine::new(store, remote, tree);
    Ok(match std::env::var(API_URL_ENV) {
        Ok(url) if !url.is_empty() => engine.with_api_url(url),
        _ => engine,
    })
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .or_else(|| dirs::data_dir().map(|dir| dir.join("marksync")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
