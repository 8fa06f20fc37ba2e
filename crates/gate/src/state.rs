//! Application state and shared resources.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::AppConfig;

/// Shared application state.
///
/// The Gate holds no visitor-keyed state at all: the only resources are the
/// configuration and the outbound HTTP client, so instances can be
/// replicated without coordination.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Outbound client for the proxy forwarder
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state with a bounded outbound client
    pub fn new(config: AppConfig) -> Result<Self> {
        // Redirects from the origin are relayed to the visitor, not followed
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .context("Failed to build outbound HTTP client")?;

        Ok(Self { config, http })
    }
}
