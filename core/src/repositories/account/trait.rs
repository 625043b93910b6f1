//! Account repository trait: the identity store as seen by the token lifecycle.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::errors::DomainError;

/// Read-only access to accounts.
///
/// Account management lives outside this system; the token lifecycle only
/// needs to resolve identities.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its ID
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with that ID
    /// * `Err(DomainError)` - Store error
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account by its login email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;
}
