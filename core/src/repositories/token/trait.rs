//! Token repository trait defining the interface for session token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::Token;
use crate::errors::DomainError;

/// Repository trait for Token entity persistence operations
///
/// Access and refresh values are unique across the store, so every lookup by
/// value yields at most one token.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Insert the token, or update the stored row with the same ID
    ///
    /// # Returns
    /// * `Ok(Token)` - The persisted token
    /// * `Err(DomainError)` - Save failed
    async fn save(&self, token: Token) -> Result<Token, DomainError>;

    /// Find a token by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Token>, DomainError>;

    /// Find a token by its access value
    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError>;

    /// Find a token by its refresh value
    async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Token>, DomainError>;

    /// List every token owned by an account, revoked or not, in store order
    ///
    /// Store order is insertion order: the earliest-issued token comes first.
    /// Eviction relies on this ordering.
    async fn find_all_by_account_id(&self, account_id: Uuid) -> Result<Vec<Token>, DomainError>;

    /// Hard-delete a token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was deleted
    /// * `Ok(false)` - Token was already gone
    async fn delete(&self, token: &Token) -> Result<bool, DomainError>;

    /// Delete `evicted` and insert `token` as one unit of work
    ///
    /// Either every eviction and the insert are applied, or the store is left
    /// untouched.
    ///
    /// # Returns
    /// * `Ok(Token)` - The inserted token
    /// * `Err(DomainError)` - Nothing was changed
    async fn replace(&self, evicted: &[Token], token: Token) -> Result<Token, DomainError>;

    /// Delete every token whose refresh value expired at or before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Count the tokens owned by an account
    async fn count_by_account_id(&self, account_id: Uuid) -> Result<usize, DomainError> {
        Ok(self.find_all_by_account_id(account_id).await?.len())
    }
}
