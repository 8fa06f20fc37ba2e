//! Access-token cookie handling.

use gatehouse_common::constants::{ACCESS_TOKEN_COOKIE, COOKIE_MAX_AGE_SECS};

/// Extract a cookie value by name from a `Cookie` header.
///
/// The first pair with a matching name wins; pairs without an `=` are
/// skipped.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for pair in header.split(';') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if key == name {
            return Some(value);
        }
    }
    None
}

/// `Set-Cookie` value installing an access token for 24 hours
pub fn issue_cookie(token: &str) -> String {
    format!("{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Secure; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/")
}

/// `Set-Cookie` value that immediately expires the access token
pub fn clear_cookie() -> String {
    format!("{ACCESS_TOKEN_COOKIE}=; HttpOnly; Secure; Max-Age=0; Path=/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_basic() {
        assert_eq!(
            cookie_value("access_token=abc123", "access_token"),
            Some("abc123")
        );
        assert_eq!(
            cookie_value("a=1; access_token=abc123; b=2", "access_token"),
            Some("abc123")
        );
        assert_eq!(cookie_value("a=1; b=2", "access_token"), None);
        assert_eq!(cookie_value("", "access_token"), None);
    }

    #[test]
    fn test_cookie_value_first_match_wins() {
        assert_eq!(
            cookie_value("access_token=first; access_token=second", "access_token"),
            Some("first")
        );
    }

    #[test]
    fn test_cookie_value_skips_malformed_pairs() {
        assert_eq!(
            cookie_value("garbage; access_token=ok", "access_token"),
            Some("ok")
        );
    }

    #[test]
    fn test_cookie_value_keeps_embedded_equals() {
        // Base64 padding lands in the value unchanged
        assert_eq!(
            cookie_value("access_token=eyJh==", "access_token"),
            Some("eyJh==")
        );
    }

    #[test]
    fn test_cookie_attributes() {
        let set = issue_cookie("tok");
        assert!(set.starts_with("access_token=tok;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Secure"));
        assert!(set.contains("Max-Age=86400"));
        assert!(set.contains("Path=/"));

        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
