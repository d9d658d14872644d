//! CLI command implementations

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use reelscout_app::{ControllerHandle, SearchBox, ViewState, spawn_controller};
use reelscout_core::backend::DisabledBackend;
use reelscout_core::{AppwriteBackend, DataAuthBackend, ReelscoutConfig};
use reelscout_search::TmdbCatalog;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Available CLI commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Search the catalog by title
    Search {
        /// Text to search for
        query: String,
    },
    /// List popular movies
    Discover,
    /// Show the most searched terms
    Trending,
    /// Search as you type, one line per edit
    Interactive,
    /// End the current backend session
    Logout,
}

/// Handle the CLI command
///
/// # Errors
/// - `ReelscoutError::Configuration` - Catalog API key is missing
/// - `CatalogError::Configuration` - Catalog client could not be built
/// - `ControllerError::ControllerShutdown` - Controller stopped unexpectedly
pub async fn handle_command(command: Commands) -> Result<()> {
    let config = ReelscoutConfig::from_env();
    config.validate()?;

    match command {
        Commands::Search { query } => show_results(config, query).await,
        Commands::Discover => show_results(config, String::new()).await,
        Commands::Trending => show_trending(config).await,
        Commands::Interactive => run_interactive(config).await,
        Commands::Logout => logout(config).await,
    }
}

/// Builds the catalog and backend clients and spawns the controller.
///
/// An unusable backend configuration only disables trending and tracking.
fn start_controller(config: ReelscoutConfig) -> Result<ControllerHandle> {
    let catalog = TmdbCatalog::new(&config.catalog)?;

    let backend: Arc<dyn DataAuthBackend> = match AppwriteBackend::new(&config.backend) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::warn!("Search tracking disabled: {e}");
            Arc::new(DisabledBackend::new(e.to_string()))
        }
    };

    Ok(spawn_controller(config, Arc::new(catalog), backend))
}

/// Runs one catalog query and prints the resulting view.
async fn show_results(config: ReelscoutConfig, query: String) -> Result<()> {
    let handle = start_controller(config)?;
    handle.bootstrap().await?;

    handle.submit_query(query).await?;
    let view = handle.wait_for_results().await?;
    print!("{view}");

    // Let search tracking finish before exiting
    handle.shutdown().await?;
    Ok(())
}

async fn show_trending(config: ReelscoutConfig) -> Result<()> {
    let handle = start_controller(config)?;
    let session = handle.bootstrap().await?;

    if !session.is_authenticated() {
        if let Some(advisory) = handle.snapshot().advisory {
            println!("{advisory}");
        }
        println!("Trending movies need a signed-in session.");
        return Ok(());
    }

    let trending = handle.refresh_trending().await?;
    if trending.is_empty() {
        println!("No searches recorded yet.");
    }
    for (rank, record) in trending.iter().enumerate() {
        println!(
            "{:>2}. {} ({} searches)",
            rank + 1,
            record.search_term,
            record.count
        );
    }

    handle.shutdown().await?;
    Ok(())
}

async fn logout(config: ReelscoutConfig) -> Result<()> {
    let handle = start_controller(config)?;
    handle.bootstrap().await?;
    handle.logout().await?;
    println!("Signed out.");

    handle.shutdown().await?;
    Ok(())
}

/// Renders the current view, then every change until the controller stops.
///
/// The current view is rendered before this returns.
fn spawn_renderer<F>(mut views: watch::Receiver<ViewState>, mut render: F) -> JoinHandle<()>
where
    F: FnMut(&ViewState) + Send + 'static,
{
    let current = views.borrow_and_update().clone();
    render(&current);

    tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            render(&view);
        }
    })
}

const INTERACTIVE_HELP: &str = "Type to search. Commands: :trending :retry :dismiss :logout :quit";

async fn run_interactive(config: ReelscoutConfig) -> Result<()> {
    let delay = config.search.debounce_delay;
    let handle = start_controller(config)?;
    let renderer = spawn_renderer(handle.subscribe(), |view| println!("{view}"));

    handle.bootstrap().await?;
    let search = SearchBox::new(handle.clone(), delay);
    search.set_text("");
    println!("{INTERACTIVE_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":help" => println!("{INTERACTIVE_HELP}"),
            ":trending" => {
                handle.refresh_trending().await?;
            }
            ":retry" => match handle.retry_login().await {
                Ok(user) => println!("Signed in as {}", user.email),
                Err(e) => println!("{e}"),
            },
            ":dismiss" => handle.dismiss_advisory().await?,
            ":logout" => handle.logout().await?,
            _ => search.set_text(line.clone()),
        }
    }

    drop(search);
    handle.shutdown().await?;
    renderer.abort();
    Ok(())
}
