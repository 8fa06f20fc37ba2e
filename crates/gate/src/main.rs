//! # Gate - Gatehouse Edge Proxy
//!
//! Fronts the protected origin. Requests with a valid `access_token` cookie
//! are reverse-proxied through; everything else is redirected to Warden's
//! challenge. Holds no visitor-keyed state.
//!
//! ## Architecture
//! ```text
//! Visitor → Gate → Origin
//!             ↓ (no valid cookie)
//!          Warden
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod cookie;
mod proxy;
mod routes;
mod state;

use config::AppConfig;
use state::AppState;

/// Gatehouse Gate - Edge Proxy
#[derive(Parser, Debug)]
#[command(name = "gate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/gate.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    pub listen: Option<String>,

    /// Protected origin base URL (overrides config)
    #[arg(long, env = "ORIGIN_URL")]
    pub origin_url: Option<String>,

    /// Warden base URL (overrides config)
    #[arg(long, env = "CHALLENGE_URL")]
    pub challenge_url: Option<String>,

    /// Public base URL of this gate (overrides config)
    #[arg(long, env = "PUBLIC_URL")]
    pub public_url: Option<String>,

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

    info!("🚪 Starting Gatehouse Gate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);
    info!("🔗 Protecting origin {}", config.origin_url);

    // Initialize application state
    let state = AppState::new(config.clone())?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("🚀 Gate listening on {}", config.listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("🛑 Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("👋 Gate shutdown complete");
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
