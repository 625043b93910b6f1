//! MySQL repository implementations

mod account_repository_impl;
mod token_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use token_repository_impl::MySqlTokenRepository;

use orchid_core::errors::DomainError;
use uuid::Uuid;

/// Map a SQLx failure into the domain's internal error
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "{}", context);
    DomainError::internal(format!("{}: {}", context, e))
}

/// Parse a CHAR(36) column into a UUID
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::internal(format!("Invalid UUID in {}: {}", column, e)))
}
