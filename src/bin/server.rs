//! Stockboard Server - headless stock API proxy
//!
//! Serves the stock listings and prices of the upstream evaluation API, with
//! simulated data whenever the upstream fails, plus chart and heatmap views
//! as JSON. Metrics are exposed on `/metrics` and pushed as JSON logs.
//!
//! # Usage
//! ```sh
//! MODE=mock cargo run --bin server -- --port 8080
//! ```
//!
//! # Environment Variables
//! - `MODE` - `live` (default) or `mock`
//! - `STOCK_API_BASE_URL` / `STOCK_API_TOKEN` - upstream API
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - listen address (overridden by flags)
//! - `OBSERVABILITY_ENABLED` / `OBSERVABILITY_INTERVAL` - JSON metrics reporter

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use stockboard::application::system::Application;
use stockboard::config::Config;
use stockboard::interfaces::http::{ApiState, router};
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless stock dashboard server")]
struct Args {
    /// Address to bind, overrides SERVER_BIND_ADDRESS
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on, overrides SERVER_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Stockboard Server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        "Configuration loaded: Mode={:?}, Upstream={}, Heatmap stocks={}",
        config.mode, config.upstream.base_url, config.dashboard.max_heatmap_stocks
    );

    let address = config.server.socket_address();
    let app = Application::build(config)?;

    if app.spawn_reporter().is_some() {
        info!("Metrics reporter started");
    }

    let state = Arc::new(ApiState::from_application(&app));
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, gracefully stopping..."),
        Err(e) => error!("Unable to listen for shutdown signal: {}", e),
    }
}
