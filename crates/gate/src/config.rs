//! Configuration management for the Gate.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use gatehouse_common::constants::{DEFAULT_GATE_LISTEN_ADDR, DEFAULT_UPSTREAM_TIMEOUT_SECS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Base URL of the protected origin (no trailing slash)
    #[serde(default = "default_origin_url")]
    pub origin_url: String,

    /// Public base URL of the Warden challenge authority (no trailing slash)
    #[serde(default = "default_challenge_url")]
    pub challenge_url: String,

    /// Public base URL this gate is reached at, used to rebuild the full
    /// original URL for the `return` parameter (no trailing slash)
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Timeout for requests forwarded to the origin, in seconds
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

// Default value functions
fn default_listen_addr() -> String {
    DEFAULT_GATE_LISTEN_ADDR.to_string()
}
fn default_origin_url() -> String {
    "http://127.0.0.1:8081".to_string()
}
fn default_challenge_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_public_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_upstream_timeout() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config: Self = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref origin) = args.origin_url {
            config.origin_url = origin.clone();
        }
        if let Some(ref challenge) = args.challenge_url {
            config.challenge_url = challenge.clone();
        }
        if let Some(ref public) = args.public_url {
            config.public_url = public.clone();
        }

        for url in [
            &mut config.origin_url,
            &mut config.challenge_url,
            &mut config.public_url,
        ] {
            *url = url.trim_end_matches('/').to_string();
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("origin_url", &self.origin_url),
            ("challenge_url", &self.challenge_url),
            ("public_url", &self.public_url),
        ] {
            url.parse::<reqwest::Url>()
                .with_context(|| format!("Invalid {name}: {url}"))?;
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            origin_url: default_origin_url(),
            challenge_url: default_challenge_url(),
            public_url: default_public_url(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}
