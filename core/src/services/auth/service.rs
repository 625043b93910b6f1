//! Main authentication service implementation

use std::sync::{Arc, OnceLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::Token;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{AccountRepository, TokenRepository};
use crate::services::token::TokenService;

/// Authentication service for login, refresh and logout
pub struct AuthService<T, A>
where
    T: TokenRepository,
    A: AccountRepository,
{
    /// Account repository for credential lookup
    account_repository: Arc<A>,
    /// Token service for the session lifecycle
    token_service: Arc<TokenService<T, A>>,
}

impl<T, A> AuthService<T, A>
where
    T: TokenRepository,
    A: AccountRepository,
{
    /// Create a new authentication service
    pub fn new(account_repository: Arc<A>, token_service: Arc<TokenService<T, A>>) -> Self {
        decoy_hash();
        Self {
            account_repository,
            token_service,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<T, A>> {
        &self.token_service
    }

    /// Check credentials and issue a new session token.
    ///
    /// Unknown email and wrong password fail identically with
    /// `AuthError::InvalidCredentials`, and both run one bcrypt comparison.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        is_mobile: bool,
    ) -> DomainResult<AuthResponse> {
        let found = self.account_repository.find_by_email(email).await?;

        let candidate = password.to_string();
        let checked = found.clone();
        // bcrypt is slow on purpose; keep it off the async workers
        let matches = tokio::task::spawn_blocking(move || match checked {
            Some(account) => account.verify_password(&candidate),
            None => {
                // Unknown emails pay for a comparison too
                let _ = bcrypt::verify(&candidate, decoy_hash());
                false
            }
        })
        .await
        .map_err(|e| DomainError::internal(format!("Password check failed: {}", e)))?;

        let account = match found {
            Some(account) if matches => account,
            Some(account) => {
                warn!(account_id = %account.id, "Login attempt with wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }
            None => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let token = self.token_service.issue(account.id, is_mobile).await?;
        info!(account_id = %account.id, token_id = %token.id, is_mobile, "Login succeeded");

        Ok(AuthResponse::new(token, account))
    }

    /// Rotate the caller's refresh value
    pub async fn refresh(&self, refresh_token: &str, caller_account_id: Uuid) -> DomainResult<Token> {
        self.token_service.refresh(refresh_token, caller_account_id).await
    }

    /// Revoke the presented access value
    pub async fn logout(&self, access_token: &str, caller_account_id: Uuid) -> DomainResult<()> {
        self.token_service.revoke(access_token, caller_account_id).await
    }

    /// Resolve a presented access value to its active token
    pub async fn authenticate(&self, access_token: &str) -> DomainResult<Token> {
        self.token_service.authenticate(access_token).await
    }

    /// The active token for `access_token` together with its owning account
    pub async fn current_session(&self, access_token: &str) -> DomainResult<AuthResponse> {
        let token = self.authenticate(access_token).await?;
        let account = self
            .account_repository
            .find_by_id(token.account_id)
            .await?
            .ok_or(TokenError::AccountNotFound)?;
        Ok(AuthResponse::new(token, account))
    }
}

/// Hash compared against when the email is unknown, built on first use
pub(crate) fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| {
        bcrypt::hash("orchid-shop-decoy", bcrypt::DEFAULT_COST).unwrap_or_default()
    })
}
