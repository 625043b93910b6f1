//! # Orchid Core
//!
//! Core business logic and domain layer for the orchid shop backend.
//! This crate contains domain entities, business services, repository interfaces,
//! and error types that form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Account, AuthResponse, Claims, RoleName, Token, TOKEN_TYPE_BEARER};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{AccountRepository, TokenRepository};
pub use services::{
    AccountLocks, AuthService, CleanupResult, Clock, JwtSigner, SystemClock,
    TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig, TokenSigner,
};

#[cfg(any(test, feature = "mock-repositories"))]
pub use repositories::{MockAccountRepository, MockTokenRepository};
#[cfg(any(test, feature = "mock-repositories"))]
pub use services::ManualClock;
