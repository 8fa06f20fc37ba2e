//! Common error types for Gatehouse components.

use thiserror::Error;

/// Common errors across Gatehouse components
#[derive(Debug, Error)]
pub enum GatehouseError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input/request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The protected origin could not be reached or answered with an error
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatehouseError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::InvalidInput(_) => 400,
            Self::Upstream(_) => 503,
            Self::Internal(_) => 500,
        }
    }
}
