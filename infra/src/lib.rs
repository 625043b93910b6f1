//! # Infrastructure Layer
//!
//! Concrete persistence for the orchid shop backend: a SQLx MySQL
//! connection pool with embedded migrations, and the account and token
//! repositories the core services run against.

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlAccountRepository, MySqlTokenRepository, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
