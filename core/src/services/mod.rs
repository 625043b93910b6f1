//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::AuthService;
pub use token::{
    AccountLocks, CleanupResult, Clock, JwtSigner, SystemClock, TokenCleanupConfig,
    TokenCleanupService, TokenService, TokenServiceConfig, TokenSigner,
};

#[cfg(any(test, feature = "mock-repositories"))]
pub use token::ManualClock;
