//! Token services for the credential lifecycle
//!
//! This module handles all token-related operations:
//! - Signed token encoding/verification with per-category keys (codec)
//! - Token family lifecycle: exchange codes, initial pairs, revocation
//! - Refresh rotation with reuse detection
//! - Background cleanup of expired records

mod cleanup;
mod codec;
mod config;
mod rotation;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use codec::{KeyCategory, TokenCodec};
pub use config::TokenServiceConfig;
pub use rotation::RotationEngine;
pub use service::TokenService;

pub(crate) use service::hash_token;
