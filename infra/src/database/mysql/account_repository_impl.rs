//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use orchid_core::domain::entities::{Account, RoleName};
use orchid_core::errors::DomainError;
use orchid_core::repositories::AccountRepository;

use super::{db_error, parse_uuid};

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Account entity
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let get = |column: &str| -> Result<String, DomainError> {
            row.try_get::<String, _>(column)
                .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", column, e)))
        };

        let id = get("id")?;
        let role = get("role")?;

        Ok(Account {
            id: parse_uuid("accounts.id", &id)?,
            name: get("name")?,
            email: get("email")?,
            password_hash: get("password_hash")?,
            role: role.parse::<RoleName>().map_err(DomainError::internal)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("Failed to get created_at: {}", e)))?,
        })
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE id = ? LIMIT 1", ACCOUNT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find account by id", e))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE email = ? LIMIT 1", ACCOUNT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find account by email", e))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }
}
