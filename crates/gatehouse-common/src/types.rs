//! Core types shared across Gatehouse components.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one challenge submission for an identity.
///
/// Produced by Warden's attempt store; the HTTP layer turns these into the
/// redirect/result pages a visitor sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Both answers matched; the visitor may proceed to the Gate
    Approved,

    /// At least one answer was wrong; the visitor may try again
    WrongAnswer {
        /// Attempts left before a lockout starts
        remaining: u32,
    },

    /// This submission exhausted the allowed attempts
    LockedOut {
        /// Full lockout window the visitor must now wait out
        retry_after: Duration,
    },

    /// A lockout is already in effect; the answers were not evaluated
    TimeoutActive {
        /// Time left until submissions are evaluated again
        remaining: Duration,
    },
}

impl SubmitOutcome {
    /// Remaining wait, rounded up to whole minutes, for the lockout
    /// outcomes. Zero for the others.
    pub fn wait_minutes(&self) -> u64 {
        match self {
            Self::LockedOut { retry_after } => retry_after.as_secs().div_ceil(60),
            Self::TimeoutActive { remaining } => remaining.as_secs().div_ceil(60),
            _ => 0,
        }
    }
}

/// JSON body of the `/api/check/{identity}` inspection endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApprovalStatus {
    pub approved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_minutes_rounds_up() {
        let outcome = SubmitOutcome::TimeoutActive {
            remaining: Duration::from_secs(540),
        };
        assert_eq!(outcome.wait_minutes(), 9);

        let outcome = SubmitOutcome::TimeoutActive {
            remaining: Duration::from_secs(541),
        };
        assert_eq!(outcome.wait_minutes(), 10);

        assert_eq!(SubmitOutcome::Approved.wait_minutes(), 0);
    }
}
