//! Visitor identity extraction.
//!
//! Attempt tracking is keyed by an identity string derived from the
//! connection. The default keys on the remote IP address, which is coarse:
//! visitors behind a shared egress address pool one record, and the address
//! is spoofable at the network layer. That is a known property of the
//! scheme, kept behind this trait so a deployment can substitute a stronger
//! key without touching the state machine.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Derives the attempt-tracking key for a connection
pub trait IdentityExtractor: Send + Sync {
    fn identity(&self, addr: SocketAddr, headers: &HeaderMap) -> String;
}

/// Default extractor: the remote socket's IP address
pub struct RemoteAddrIdentity;

impl IdentityExtractor for RemoteAddrIdentity {
    fn identity(&self, addr: SocketAddr, _headers: &HeaderMap) -> String {
        addr.ip().to_string()
    }
}
