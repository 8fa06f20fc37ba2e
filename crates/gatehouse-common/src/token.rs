//! Access token issue/validate.
//!
//! The token is the bearer credential the Gate sets as the `access_token`
//! cookie: base64 over a two-field JSON payload, valid for 24 hours from
//! issue. The encoding is reversible and carries no signature, so anyone who
//! knows the shape can mint a passing cookie. That matches the deployed
//! behavior this service replaces; a deployment that needs a real trust
//! boundary should wrap the payload in a MAC while keeping the same two
//! checks (`approved` flag, 24-hour age window).

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_TTL_SECS;

/// Token validity window in milliseconds
const TOKEN_TTL_MS: i64 = TOKEN_TTL_SECS as i64 * 1000;

/// Decoded token payload.
///
/// Field names are the wire format; `timestamp` is milliseconds since the
/// Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub approved: bool,
    pub timestamp: i64,
}

/// Issue a fresh token encoding `{approved: true, timestamp: now}`.
pub fn issue() -> String {
    issue_at(Utc::now())
}

/// Issue a token as of an explicit instant.
pub fn issue_at(now: DateTime<Utc>) -> String {
    let payload = AccessToken {
        approved: true,
        timestamp: now.timestamp_millis(),
    };

    // Serializing two plain fields cannot fail
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    STANDARD.encode(json)
}

/// Validate a raw cookie value.
///
/// Returns `false` for anything that does not decode to an approved,
/// unexpired payload. Decode and parse failures are swallowed here; the
/// caller only ever sees a boolean.
pub fn validate(raw: &str) -> bool {
    validate_at(raw, Utc::now())
}

/// Validate against an explicit instant.
pub fn validate_at(raw: &str, now: DateTime<Utc>) -> bool {
    let Ok(bytes) = STANDARD.decode(raw.trim()) else {
        return false;
    };

    let Ok(token) = serde_json::from_slice::<AccessToken>(&bytes) else {
        return false;
    };

    token.approved && now.timestamp_millis() - token.timestamp < TOKEN_TTL_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_issue_and_validate() {
        let token = issue();
        assert!(validate(&token));
    }

    #[test]
    fn test_valid_within_window_expired_after() {
        let issued = Utc::now();
        let token = issue_at(issued);

        assert!(validate_at(&token, issued));
        assert!(validate_at(
            &token,
            issued + Duration::hours(24) - Duration::milliseconds(1)
        ));
        assert!(!validate_at(&token, issued + Duration::hours(24)));
        assert!(!validate_at(&token, issued + Duration::hours(25)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(!validate(""));
        assert!(!validate("not base64 at all!!"));
        // Valid base64, not JSON
        assert!(!validate(&STANDARD.encode("hello")));
        // Valid JSON, wrong shape
        assert!(!validate(&STANDARD.encode("[1,2,3]")));
    }

    #[test]
    fn test_rejects_unapproved_payload() {
        let raw = STANDARD.encode(format!(
            r#"{{"approved":false,"timestamp":{}}}"#,
            Utc::now().timestamp_millis()
        ));
        assert!(!validate(&raw));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let raw = STANDARD.encode(format!(
            r#"{{"timestamp":{}}}"#,
            Utc::now().timestamp_millis()
        ));
        assert!(!validate(&raw));

        let raw = STANDARD.encode(r#"{"approved":true}"#);
        assert!(!validate(&raw));

        // Non-boolean approved
        let raw = STANDARD.encode(r#"{"approved":"yes","timestamp":0}"#);
        assert!(!validate(&raw));
    }
}
