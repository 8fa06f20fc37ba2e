//! Shared constants for Gatehouse components.

/// Name of the cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Access token validity (24 hours)
pub const TOKEN_TTL_SECS: u64 = 86_400;

/// Cookie Max-Age, matches the token validity
pub const COOKIE_MAX_AGE_SECS: u64 = 86_400;

/// Wrong submissions allowed before a lockout starts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Lockout window after exhausting attempts (10 minutes)
pub const DEFAULT_LOCKOUT_SECS: u64 = 600;

/// How often the stale-record sweep runs (5 minutes)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Idle age after which an unlocked record is swept (1 hour)
pub const DEFAULT_RECORD_IDLE_SECS: u64 = 3_600;

/// Default Gate HTTP listen address
pub const DEFAULT_GATE_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Default Warden HTTP listen address
pub const DEFAULT_WARDEN_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Default timeout for requests forwarded to the origin (seconds)
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Fixed HTTP paths shared between the Gate and Warden
pub mod paths {
    /// Gate: mints the access cookie and redirects back
    pub const CHALLENGE_SUCCESS: &str = "/challenge/success";

    /// Gate: clears the access cookie
    pub const LOGOUT: &str = "/logout";

    /// Warden: entry page a gated visitor is redirected to
    pub const ACCESS_REQUIRED: &str = "/access-required";

    /// Warden: question form (GET) and submission target (POST)
    pub const CHALLENGE: &str = "/challenge";
}
