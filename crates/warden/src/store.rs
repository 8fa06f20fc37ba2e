//! In-memory attempt tracking.
//!
//! One [`ChallengeRecord`] per identity, created lazily on first submission
//! and living for the life of the process (a restart clears everything).
//! Each record sits behind its own mutex so concurrent submissions from the
//! same identity serialize, while different identities never block each
//! other. Callers only get atomic operations; the record itself is never
//! handed out for read-then-write across calls.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use gatehouse_common::SubmitOutcome;

/// One visitor's progress against the challenge
#[derive(Debug)]
struct ChallengeRecord {
    /// Wrong submissions since the last reset
    attempts: u32,
    /// Set exactly when `attempts` reaches the maximum
    lockout_started_at: Option<DateTime<Utc>>,
    /// Latched true by a correct submission
    approved: bool,
    /// Last submission time, used by the stale sweep
    last_seen: DateTime<Utc>,
}

impl ChallengeRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            attempts: 0,
            lockout_started_at: None,
            approved: false,
            last_seen: now,
        }
    }
}

/// Attempt-tracking store and state machine
pub struct AttemptStore {
    max_attempts: u32,
    lockout_window: Duration,
    answer1: String,
    answer2: String,
    records: RwLock<HashMap<String, Arc<Mutex<ChallengeRecord>>>>,
}

impl AttemptStore {
    /// Create a store with the configured attempt ceiling, lockout window,
    /// and the two expected answers (normalized once here).
    pub fn new(max_attempts: u32, lockout_window: Duration, answer1: &str, answer2: &str) -> Self {
        Self {
            max_attempts,
            lockout_window,
            answer1: normalize(answer1),
            answer2: normalize(answer2),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Evaluate one submission for an identity.
    pub async fn submit(&self, identity: &str, answer1: &str, answer2: &str) -> SubmitOutcome {
        self.submit_at(identity, answer1, answer2, Utc::now()).await
    }

    /// Evaluate one submission as of an explicit instant.
    ///
    /// Rules, in order: an active lockout rejects the submission without
    /// consuming an attempt or looking at the answers; an elapsed lockout
    /// resets the record first; then both answers must match (trimmed,
    /// case-insensitive) to approve, otherwise the attempt counter advances
    /// and may start a lockout.
    pub async fn submit_at(
        &self,
        identity: &str,
        answer1: &str,
        answer2: &str,
        now: DateTime<Utc>,
    ) -> SubmitOutcome {
        let record = self.record_for(identity, now).await;
        let mut r = record.lock().await;
        r.last_seen = now;

        if let Some(started) = r.lockout_started_at {
            let elapsed = now - started;
            if elapsed < self.lockout_window {
                let remaining = self.lockout_window - elapsed;
                return SubmitOutcome::TimeoutActive {
                    remaining: remaining.to_std().unwrap_or_default(),
                };
            }
            // Window elapsed: back to a fresh record before evaluating
            r.attempts = 0;
            r.lockout_started_at = None;
        }

        if normalize(answer1) == self.answer1 && normalize(answer2) == self.answer2 {
            r.approved = true;
            r.attempts = 0;
            r.lockout_started_at = None;

            tracing::info!(identity = %identity, "Visitor approved");

            return SubmitOutcome::Approved;
        }

        r.attempts += 1;
        if r.attempts >= self.max_attempts {
            r.lockout_started_at = Some(now);

            tracing::warn!(
                identity = %identity,
                attempts = r.attempts,
                "Identity locked out after failed attempts"
            );

            SubmitOutcome::LockedOut {
                retry_after: self.lockout_window.to_std().unwrap_or_default(),
            }
        } else {
            SubmitOutcome::WrongAnswer {
                remaining: self.max_attempts - r.attempts,
            }
        }
    }

    /// Whether an identity has ever passed the challenge (and has not been
    /// swept since).
    pub async fn is_approved(&self, identity: &str) -> bool {
        let records = self.records.read().await;
        match records.get(identity) {
            Some(record) => record.lock().await.approved,
            None => false,
        }
    }

    /// Number of identities currently tracked
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Drop records idle past `max_idle`, returning how many were removed.
    ///
    /// Records under an active lockout are kept so an eviction cannot cut a
    /// lockout short; records whose mutex is currently held are in use and
    /// kept as well.
    pub async fn sweep_stale(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();

        records.retain(|_, record| {
            let Ok(r) = record.try_lock() else {
                return true;
            };
            if let Some(started) = r.lockout_started_at {
                if now - started < self.lockout_window {
                    return true;
                }
            }
            now - r.last_seen < max_idle
        });

        before - records.len()
    }

    /// Fetch or lazily create the record for an identity.
    async fn record_for(&self, identity: &str, now: DateTime<Utc>) -> Arc<Mutex<ChallengeRecord>> {
        if let Some(record) = self.records.read().await.get(identity) {
            return record.clone();
        }

        let mut records = self.records.write().await;
        records
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ChallengeRecord::new(now))))
            .clone()
    }
}

/// Answer comparison is case-insensitive and ignores surrounding whitespace
fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn store() -> AttemptStore {
        AttemptStore::new(2, Duration::minutes(10), "red", "apple")
    }

    #[tokio::test]
    async fn test_correct_answers_approve() {
        let store = store();
        let outcome = store.submit("10.0.0.1", "red", "apple").await;
        assert_eq!(outcome, SubmitOutcome::Approved);
        assert!(store.is_approved("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_answers_trimmed_and_case_insensitive() {
        let store = store();
        let outcome = store.submit("10.0.0.1", "  Red ", "APPLE").await;
        assert_eq!(outcome, SubmitOutcome::Approved);
    }

    #[tokio::test]
    async fn test_lockout_scenario() {
        let store = store();
        let t0 = Utc::now();

        let outcome = store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        assert_eq!(outcome, SubmitOutcome::WrongAnswer { remaining: 1 });

        let outcome = store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        assert_eq!(
            outcome,
            SubmitOutcome::LockedOut {
                retry_after: StdDuration::from_secs(600)
            }
        );

        // One minute in: still locked, roughly nine minutes left, and the
        // answers are not evaluated even when correct
        let outcome = store
            .submit_at("10.0.0.1", "red", "apple", t0 + Duration::minutes(1))
            .await;
        match outcome {
            SubmitOutcome::TimeoutActive { remaining } => {
                assert_eq!(remaining, StdDuration::from_secs(540));
            }
            other => panic!("expected TimeoutActive, got {other:?}"),
        }
        assert!(!store.is_approved("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_elapsed_lockout_resets_attempts() {
        let store = store();
        let t0 = Utc::now();

        store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;

        // After the window, a wrong answer is a fresh first attempt
        let outcome = store
            .submit_at("10.0.0.1", "wrong", "wrong", t0 + Duration::minutes(11))
            .await;
        assert_eq!(outcome, SubmitOutcome::WrongAnswer { remaining: 1 });
    }

    #[tokio::test]
    async fn test_success_resets_prior_attempts() {
        let store = store();
        let t0 = Utc::now();

        store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        let outcome = store.submit_at("10.0.0.1", "red", "apple", t0).await;
        assert_eq!(outcome, SubmitOutcome::Approved);

        // Attempts were reset: two wrong answers are needed again to lock
        let outcome = store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        assert_eq!(outcome, SubmitOutcome::WrongAnswer { remaining: 1 });
    }

    #[tokio::test]
    async fn test_repeated_success_is_idempotent() {
        let store = store();
        assert_eq!(
            store.submit("10.0.0.1", "red", "apple").await,
            SubmitOutcome::Approved
        );
        assert_eq!(
            store.submit("10.0.0.1", "red", "apple").await,
            SubmitOutcome::Approved
        );
        assert!(store.is_approved("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_identities_tracked_separately() {
        let store = store();
        let t0 = Utc::now();

        store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;
        store.submit_at("10.0.0.1", "wrong", "wrong", t0).await;

        // A different identity is unaffected by the first one's lockout
        let outcome = store.submit_at("10.0.0.2", "red", "apple", t0).await;
        assert_eq!(outcome, SubmitOutcome::Approved);
    }

    #[tokio::test]
    async fn test_unknown_identity_not_approved() {
        let store = store();
        assert!(!store.is_approved("203.0.113.7").await);
    }

    #[tokio::test]
    async fn test_sweep_removes_idle_records_keeps_locked() {
        let store = store();
        let t0 = Utc::now();

        store.submit_at("idle", "wrong", "wrong", t0).await;

        // Locked out at t0 + 2h, so still locked at sweep time
        let late = t0 + Duration::hours(2);
        store.submit_at("locked", "wrong", "wrong", late).await;
        store.submit_at("locked", "wrong", "wrong", late).await;

        let removed = store
            .sweep_stale(late + Duration::minutes(5), Duration::hours(1))
            .await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
    }
}
