//! Shared utilities and common types for the orchid shop server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Error and response envelopes returned by the HTTP layer

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, ServerConfig, TokenPolicyConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
