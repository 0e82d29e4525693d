//! Form Relay
//!
//! Accepts HTML form submissions over HTTP and stores them in a JSON file,
//! with a datagram hop between the web-facing and the storage-facing server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────────────┐
//!                       │                      FORM RELAY                        │
//!                       │                                                        │
//!    Browser            │  ┌─────────────┐   POST   ┌──────────┐                 │
//!    ───────────────────┼─▶│    http     │─────────▶│  relay   │                 │
//!                       │  │   server    │          │  client  │                 │
//!    ◀──────────────────┼──│ (GET pages, │          └────┬─────┘                 │
//!    page / static /404 │  │  static)    │               │ UDP datagram          │
//!                       │  └─────────────┘               ▼                       │
//!                       │                         ┌──────────────┐   merge       │
//!                       │                         │    ingest    │──────────▶ data.json
//!                       │                         │    server    │  (single      │
//!                       │                         └──────────────┘   writer)     │
//!                       │                                                        │
//!                       │  lifecycle: start both units, stop both on SIGINT/TERM │
//!                       └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use form_relay::config::{load_config, validate_config, ConfigError, FormRelayConfig};
use form_relay::lifecycle;
use form_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "form-relay")]
#[command(about = "Relay HTML form submissions into a JSON store", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the page documents and static files
    #[arg(long)]
    base_dir: Option<String>,

    /// Path of the JSON store
    #[arg(long)]
    store: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FormRelayConfig::default(),
    };
    if let Some(base_dir) = args.base_dir {
        config.site.base_dir = base_dir;
    }
    if let Some(store) = args.store {
        config.store.path = store;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("form-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        http = %config.http.bind_address,
        ingest = %config.ingest.bind_address,
        relay_target = %config.relay.target_address,
        store = %config.store.path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let running = lifecycle::start(&config).await?;
    running.wait().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
