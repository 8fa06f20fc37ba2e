//! Configuration management for Warden.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use gatehouse_common::constants::{
    DEFAULT_LOCKOUT_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_RECORD_IDLE_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_WARDEN_LISTEN_ADDR,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Public base URL of the Gate (no trailing slash); success redirects
    /// point at `{gate_url}/challenge/success`
    #[serde(default = "default_gate_url")]
    pub gate_url: String,

    /// First expected answer
    #[serde(default = "default_answer1")]
    pub answer1: String,

    /// Second expected answer
    #[serde(default = "default_answer2")]
    pub answer2: String,

    /// Wrong submissions allowed before a lockout starts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Lockout window in seconds
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,

    /// Stale-record sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Stale-record sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// How often the sweep runs, in seconds
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,

    /// Idle age after which an unlocked record is dropped, in seconds
    #[serde(default = "default_record_idle")]
    pub record_idle_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval(),
            record_idle_secs: default_record_idle(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    DEFAULT_WARDEN_LISTEN_ADDR.to_string()
}
fn default_gate_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_answer1() -> String {
    "red".to_string()
}
fn default_answer2() -> String {
    "apple".to_string()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_lockout_secs() -> u64 {
    DEFAULT_LOCKOUT_SECS
}
fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}
fn default_record_idle() -> u64 {
    DEFAULT_RECORD_IDLE_SECS
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
        if let Some(ref gate_url) = args.gate_url {
            config.gate_url = gate_url.clone();
        }
        if let Some(ref answer1) = args.answer1 {
            config.answer1 = answer1.clone();
        }
        if let Some(ref answer2) = args.answer2 {
            config.answer2 = answer2.clone();
        }

        config.gate_url = config.gate_url.trim_end_matches('/').to_string();

        if config.answer1 == default_answer1() && config.answer2 == default_answer2() {
            tracing::warn!("Using built-in sample answers - override them for any real deployment");
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            gate_url: default_gate_url(),
            answer1: default_answer1(),
            answer2: default_answer2(),
            max_attempts: default_max_attempts(),
            lockout_secs: default_lockout_secs(),
            sweep: SweepConfig::default(),
        }
    }
}
