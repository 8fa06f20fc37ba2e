//! Application state and shared resources.

use chrono::Duration;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::{IdentityExtractor, RemoteAddrIdentity};
use crate::store::AttemptStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Per-identity attempt tracking
    pub store: Arc<AttemptStore>,

    /// Derives the tracking key for a connection
    pub identity: Arc<dyn IdentityExtractor>,
}

impl AppState {
    /// Create new application state from the loaded configuration
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(AttemptStore::new(
            config.max_attempts,
            Duration::seconds(config.lockout_secs as i64),
            &config.answer1,
            &config.answer2,
        ));

        Self {
            config,
            store,
            identity: Arc::new(RemoteAddrIdentity),
        }
    }
}
