//! Background sweep of stale challenge records.
//!
//! The store otherwise grows for the life of the process; this worker drops
//! records that have been idle past the configured age, leaving active
//! lockouts untouched.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::store::AttemptStore;

/// Periodic sweep worker, runs until the shutdown channel fires.
pub async fn sweep_worker(
    store: Arc<AttemptStore>,
    interval: Duration,
    record_idle: chrono::Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        idle_secs = record_idle.num_seconds(),
        "🧹 Record sweep worker started"
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let removed = store.sweep_stale(Utc::now(), record_idle).await;
                if removed > 0 {
                    tracing::debug!(removed = removed, "Swept stale challenge records");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("🧹 Record sweep worker shutting down...");
                break;
            }
        }
    }
}
