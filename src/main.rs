//! Localized not-found pages (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │              NOT-FOUND PAGES                 │
//!   Client Request    │  ┌─────────┐      ┌──────────────────┐       │
//!   ──────────────────┼─▶│  http   │─────▶│ upstream forward │───────┼──▶ Content
//!                     │  │ server  │      └────────┬─────────┘       │    Application
//!                     │  └─────────┘               │ 404 on GET      │
//!                     │                            ▼                 │
//!                     │  ┌─────────┐      ┌──────────────────┐       │
//!                     │  │ routing │◀─────│  PathLocalizer   │───────┼──▶ GET /<dims>/404
//!                     │  │segments │      │ guard/fetch/map  │       │    (via this server)
//!                     │  └────┬────┘      └──────────────────┘       │
//!                     │       ▼                                      │
//!                     │  ┌──────────┐  ┌────────┐  ┌──────────────┐  │
//!                     │  │dimensions│  │ config │  │observability │  │
//!                     │  └──────────┘  └────────┘  └──────────────┘  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use not_found_pages::config::watcher::ConfigWatcher;
use not_found_pages::config::{load_config, AppConfig};
use not_found_pages::dimensions::DimensionPresetTable;
use not_found_pages::fallback::DEFAULT_PATH;
use not_found_pages::lifecycle::signals::shutdown_on_signal;
use not_found_pages::observability::{logging, metrics};
use not_found_pages::routing::append_first_uri_part_if_valid_dimension;
use not_found_pages::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "not-found-pages")]
#[command(about = "Serves localized not-found pages for a dimension-routed content application", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default)
    Serve,
    /// Print the fallback path resolved for a request path
    Resolve {
        /// Inbound request path, e.g. /de_fr/about
        request_path: String,

        /// Candidate fallback path
        #[arg(short, long, default_value = DEFAULT_PATH)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.config).await,
        Commands::Resolve { request_path, path } => {
            let table = DimensionPresetTable::from_config(&config.dimensions);
            let resolved = append_first_uri_part_if_valid_dimension(
                &request_path,
                &path,
                &table,
                config.routing.support_empty_segment_for_dimensions,
            );
            let output = serde_json::json!({
                "request_path": request_path,
                "candidate": path,
                "resolved": resolved,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);

    tracing::info!("not-found-pages v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        dimensions = config.dimensions.len(),
        support_empty_segments = config.routing.support_empty_segment_for_dimensions,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    let signals = shutdown.clone();
    tokio::spawn(async move { shutdown_on_signal(&signals).await });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
