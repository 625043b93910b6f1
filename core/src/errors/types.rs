//! Error types for authentication and session-token operations
//!
//! Messages here are for logs; the presentation layer maps each variant to
//! its own status code and client-facing message.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are not distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Session-token lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token already revoked")]
    TokenAlreadyRevoked,

    #[error("Token does not belong to the caller")]
    TokenOwnershipMismatch,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token signing failed")]
    SigningFailed,
}
