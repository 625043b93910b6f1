//! MySQL implementation of the TokenRepository trait.
//!
//! Token values are stored as issued; lookups by access or refresh value hit
//! the unique indexes on those columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

use orchid_core::domain::entities::Token;
use orchid_core::errors::DomainError;
use orchid_core::repositories::TokenRepository;

use super::{db_error, parse_uuid};

const TOKEN_COLUMNS: &str = "id, account_id, token, refresh_token, token_type, expires_at, \
     refresh_expires_at, is_mobile, revoked, created_at";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Token entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<Token, DomainError> {
        fn field<'r, T>(row: &'r sqlx::mysql::MySqlRow, column: &str) -> Result<T, DomainError>
        where
            T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
        {
            row.try_get::<T, _>(column)
                .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", column, e)))
        }

        let id: String = field(row, "id")?;
        let account_id: String = field(row, "account_id")?;

        Ok(Token {
            id: parse_uuid("tokens.id", &id)?,
            account_id: parse_uuid("tokens.account_id", &account_id)?,
            token: field(row, "token")?,
            refresh_token: field(row, "refresh_token")?,
            token_type: field(row, "token_type")?,
            expires_at: field::<DateTime<Utc>>(row, "expires_at")?,
            refresh_expires_at: field::<DateTime<Utc>>(row, "refresh_expires_at")?,
            is_mobile: field(row, "is_mobile")?,
            revoked: field(row, "revoked")?,
            created_at: field::<DateTime<Utc>>(row, "created_at")?,
        })
    }

    /// Insert-or-update by id; account_id and created_at are fixed at insert
    async fn upsert<'e, E>(executor: E, token: &Token) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let query = r#"
            INSERT INTO tokens (
                id, account_id, token, refresh_token, token_type, expires_at,
                refresh_expires_at, is_mobile, revoked, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                token = VALUES(token),
                refresh_token = VALUES(refresh_token),
                token_type = VALUES(token_type),
                expires_at = VALUES(expires_at),
                refresh_expires_at = VALUES(refresh_expires_at),
                is_mobile = VALUES(is_mobile),
                revoked = VALUES(revoked)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.account_id.to_string())
            .bind(&token.token)
            .bind(&token.refresh_token)
            .bind(&token.token_type)
            .bind(token.expires_at)
            .bind(token.refresh_expires_at)
            .bind(token.is_mobile)
            .bind(token.revoked)
            .bind(token.created_at)
            .execute(executor)
            .await?;
        Ok(())
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<Token>, DomainError> {
        let query = format!("SELECT {} FROM tokens WHERE {} = ? LIMIT 1", TOKEN_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: Token) -> Result<Token, DomainError> {
        Self::upsert(&self.pool, &token)
            .await
            .map_err(|e| db_error("Failed to save token", e))?;
        Ok(token)
    }

    async fn replace(&self, evicted: &[Token], token: Token) -> Result<Token, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start token transaction", e))?;

        for victim in evicted {
            sqlx::query("DELETE FROM tokens WHERE id = ?")
                .bind(victim.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to evict token", e))?;
        }
        Self::upsert(&mut *tx, &token)
            .await
            .map_err(|e| db_error("Failed to insert token", e))?;

        // Dropping the transaction on any error above rolls it back
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit token transaction", e))?;
        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Token>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError> {
        self.find_one("token", token.to_string()).await
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Token>, DomainError> {
        self.find_one("refresh_token", refresh_token.to_string()).await
    }

    async fn find_all_by_account_id(&self, account_id: Uuid) -> Result<Vec<Token>, DomainError> {
        let query = format!(
            "SELECT {} FROM tokens WHERE account_id = ? ORDER BY seq",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(account_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list tokens for account", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn delete(&self, token: &Token) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = ?")
            .bind(token.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE refresh_expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_by_account_id(&self, account_id: Uuid) -> Result<usize, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM tokens WHERE account_id = ?")
            .bind(account_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count tokens", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| DomainError::internal(format!("Failed to get total: {}", e)))?;
        Ok(total as usize)
    }
}
