//! # Gatehouse Common
//!
//! Shared types, the access-token codec, and constants used by the
//! Gatehouse components.
//!
//! ## Modules
//! - `token` - Access token issue/validate (the bearer cookie payload)
//! - `types` - Core data structures (SubmitOutcome, ApprovalStatus)
//! - `error` - Common error types
//! - `constants` - Shared configuration constants and fixed paths

pub mod constants;
pub mod error;
pub mod token;
pub mod types;

pub use error::GatehouseError;
pub use types::*;
