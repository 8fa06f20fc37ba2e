//! # Warden - Gatehouse Challenge Authority
//!
//! Renders the challenge, tracks per-identity attempts and lockouts in
//! memory, and hands approved visitors back to the Gate.
//!
//! ## Architecture
//! ```text
//! Visitor → Gate (no cookie) → Warden → Gate /challenge/success → Origin
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod identity;
mod routes;
mod state;
mod store;
mod sweep;

use config::AppConfig;
use state::AppState;

/// Gatehouse Warden - Challenge Authority
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/warden.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    pub listen: Option<String>,

    /// Public base URL of the Gate (overrides config)
    #[arg(long, env = "GATE_URL")]
    pub gate_url: Option<String>,

    /// First expected answer (overrides config)
    #[arg(long, env = "CHALLENGE_ANSWER1")]
    pub answer1: Option<String>,

    /// Second expected answer (overrides config)
    #[arg(long, env = "CHALLENGE_ANSWER2")]
    pub answer2: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🛡️ Starting Gatehouse Warden v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);

    // Create shutdown broadcast channel
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    // Initialize application state
    let state = AppState::new(config.clone());

    // Spawn the stale-record sweep worker
    let sweep_store = state.store.clone();
    let sweep_shutdown = shutdown_tx.subscribe();
    let sweep_interval = Duration::from_secs(config.sweep.interval_secs);
    let record_idle = chrono::Duration::seconds(config.sweep.record_idle_secs as i64);
    tokio::spawn(async move {
        sweep::sweep_worker(sweep_store, sweep_interval, record_idle, sweep_shutdown).await;
    });

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("🚀 Warden listening on {}", config.listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("🛑 Shutdown signal received");
        let _ = shutdown_tx.send(());
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
    .context("Server error")?;

    info!("👋 Warden shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
