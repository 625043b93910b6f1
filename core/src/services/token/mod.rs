//! Token service module for session token management
//!
//! This module handles all token-related operations including:
//! - Issuing tokens under a per-account cap, with eviction
//! - Refresh value rotation and revocation
//! - JWT signing and verification of access values
//! - Background cleanup of refresh-expired tokens

mod cleanup;
mod clock;
mod config;
mod locks;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
#[cfg(any(test, feature = "mock-repositories"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use config::{
    TokenServiceConfig, DEFAULT_ACCESS_TOKEN_TTL_SECONDS, DEFAULT_MAX_ACTIVE_TOKENS,
    DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
};
pub use locks::AccountLocks;
pub use service::{TokenService, REFRESH_TOKEN_LENGTH};
pub use signer::{JwtSigner, TokenSigner};
