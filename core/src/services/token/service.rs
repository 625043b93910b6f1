//! Token lifecycle: issue, refresh, revoke and lookup of session tokens

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{Account, Token};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{AccountRepository, TokenRepository};

use super::cleanup::{TokenCleanupConfig, TokenCleanupService};
use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::locks::AccountLocks;
use super::signer::TokenSigner;

/// Length of generated refresh values
pub const REFRESH_TOKEN_LENGTH: usize = 64;

/// Service managing the lifecycle of session tokens.
///
/// Every mutation of an account's token set happens while holding that
/// account's lock from [`AccountLocks`], so the per-account cap holds under
/// concurrent requests.
pub struct TokenService<T: TokenRepository, A: AccountRepository> {
    tokens: Arc<T>,
    accounts: Arc<A>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    locks: Arc<AccountLocks>,
    config: TokenServiceConfig,
}

impl<T: TokenRepository, A: AccountRepository> TokenService<T, A> {
    /// Creates a token service running on the system clock
    pub fn new(
        tokens: Arc<T>,
        accounts: Arc<A>,
        signer: Arc<dyn TokenSigner>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            tokens,
            accounts,
            signer,
            clock: Arc::new(SystemClock),
            locks: Arc::new(AccountLocks::new()),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn locks(&self) -> Arc<AccountLocks> {
        Arc::clone(&self.locks)
    }

    /// A cleanup service sweeping the same store, locks and clock as this service
    pub fn cleanup_service(&self, config: TokenCleanupConfig) -> TokenCleanupService<T> {
        TokenCleanupService::new(Arc::clone(&self.tokens), config)
            .with_locks(self.locks())
            .with_clock(Arc::clone(&self.clock))
    }

    /// Issues a new token for `account_id`, evicting one first if the account is at its cap.
    ///
    /// The victim is the first non-mobile token in listing order, or the first
    /// token outright when every held token is mobile.
    ///
    /// The new token is signed before anything is evicted, and the store
    /// applies evictions and insert as one unit, so a failure leaves the
    /// account's existing tokens in place.
    ///
    /// # Errors
    ///
    /// * `TokenError::AccountNotFound` - no such account
    /// * `TokenError::SigningFailed` - the access value could not be signed
    pub async fn issue(&self, account_id: Uuid, is_mobile: bool) -> Result<Token, DomainError> {
        let account = self.resolve_account(account_id).await?;

        let _guard = self.locks.acquire(account_id).await;

        let now = self.clock.now();
        let access_ttl = self.config.access_ttl();
        let access_value = self.signer.sign(&account, now, now + access_ttl)?;
        let token = Token::new(
            account_id,
            access_value,
            generate_refresh_value(),
            is_mobile,
            now,
            access_ttl,
            self.config.refresh_ttl(),
        );

        let mut owned = self.tokens.find_all_by_account_id(account_id).await?;
        let cap = self.config.effective_cap();
        let mut evicted = Vec::new();
        while owned.len() >= cap {
            evicted.push(owned.remove(eviction_index(&owned)));
        }

        // Evictions and the insert land together or not at all
        let token = self.tokens.replace(&evicted, token).await?;
        for victim in &evicted {
            info!(
                account_id = %account_id,
                token_id = %victim.id,
                victim_is_mobile = victim.is_mobile,
                "Evicted token to stay within per-account cap"
            );
        }
        info!(
            account_id = %account_id,
            token_id = %token.id,
            is_mobile,
            "Issued session token"
        );
        Ok(token)
    }

    /// Exchanges a refresh value for new access and refresh values on the same token.
    ///
    /// A token whose refresh value has expired is deleted before `TokenExpired`
    /// is returned. With ownership enforcement on, the caller must own the token
    /// and the new access value is signed for the stored owner; with it off,
    /// the caller's identity is used for signing.
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenNotFound` - unknown or already-rotated refresh value
    /// * `TokenError::TokenOwnershipMismatch` - caller does not own the token
    /// * `TokenError::TokenExpired` - refresh value expired; the token is gone
    /// * `TokenError::TokenAlreadyRevoked` - the token was revoked
    /// * `TokenError::AccountNotFound` - signing identity does not resolve
    pub async fn refresh(
        &self,
        refresh_token: &str,
        caller_account_id: Uuid,
    ) -> Result<Token, DomainError> {
        let found = self
            .tokens
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(TokenError::TokenNotFound)?;

        let _guard = self.locks.acquire(found.account_id).await;

        // Another request may have rotated or removed the row while we waited
        let mut token = self
            .tokens
            .find_by_id(found.id)
            .await?
            .filter(|t| t.refresh_token == refresh_token)
            .ok_or(TokenError::TokenNotFound)?;

        if self.config.enforce_refresh_ownership && !token.is_owned_by(caller_account_id) {
            warn!(
                token_id = %token.id,
                caller_account_id = %caller_account_id,
                "Refresh attempted by an account that does not own the token"
            );
            return Err(TokenError::TokenOwnershipMismatch.into());
        }

        let now = self.clock.now();
        if token.is_refresh_expired(now) {
            self.tokens.delete(&token).await?;
            info!(
                account_id = %token.account_id,
                token_id = %token.id,
                "Deleted token with expired refresh value"
            );
            return Err(TokenError::TokenExpired.into());
        }

        if token.revoked {
            return Err(TokenError::TokenAlreadyRevoked.into());
        }

        let signing_account_id = if self.config.enforce_refresh_ownership {
            token.account_id
        } else {
            caller_account_id
        };
        let account = self.resolve_account(signing_account_id).await?;

        let access_ttl = self.config.access_ttl();
        let access_value = self.signer.sign(&account, now, now + access_ttl)?;
        token.rotate(
            access_value,
            generate_refresh_value(),
            now,
            access_ttl,
            self.config.refresh_ttl(),
        );

        let token = self.tokens.save(token).await?;
        info!(
            account_id = %token.account_id,
            token_id = %token.id,
            signed_for = %signing_account_id,
            "Refreshed session token"
        );
        Ok(token)
    }

    /// Revokes the token carrying `access_token`; the row is kept.
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenNotFound` - unknown access value
    /// * `TokenError::TokenAlreadyRevoked` - revoked earlier
    /// * `TokenError::TokenOwnershipMismatch` - caller does not own the token
    pub async fn revoke(&self, access_token: &str, caller_account_id: Uuid) -> Result<(), DomainError> {
        let found = self
            .tokens
            .find_by_token(access_token)
            .await?
            .ok_or(TokenError::TokenNotFound)?;

        let _guard = self.locks.acquire(found.account_id).await;

        let mut token = self
            .tokens
            .find_by_id(found.id)
            .await?
            .filter(|t| t.token == access_token)
            .ok_or(TokenError::TokenNotFound)?;

        if token.revoked {
            return Err(TokenError::TokenAlreadyRevoked.into());
        }

        if !token.is_owned_by(caller_account_id) {
            warn!(
                token_id = %token.id,
                caller_account_id = %caller_account_id,
                "Revocation attempted by an account that does not own the token"
            );
            return Err(TokenError::TokenOwnershipMismatch.into());
        }

        token.revoke();
        let token = self.tokens.save(token).await?;
        info!(account_id = %token.account_id, token_id = %token.id, "Revoked session token");
        Ok(())
    }

    /// Raw lookup by access value.
    ///
    /// No revocation or expiry check happens here; use [`Self::authenticate`]
    /// to decide whether a presented value may be used.
    pub async fn find_by_value(&self, access_token: &str) -> Result<Token, DomainError> {
        self.tokens
            .find_by_token(access_token)
            .await?
            .ok_or_else(|| TokenError::TokenNotFound.into())
    }

    /// Accepts a presented access value only if its signature verifies and
    /// the stored token is neither revoked nor expired.
    pub async fn authenticate(&self, access_token: &str) -> Result<Token, DomainError> {
        let claims = self.signer.verify(access_token)?;
        let token = self.find_by_value(access_token).await?;

        if claims.account_id().ok() != Some(token.account_id) {
            debug!(token_id = %token.id, "Claims subject does not match stored owner");
            return Err(TokenError::InvalidToken.into());
        }
        if token.revoked {
            return Err(TokenError::TokenAlreadyRevoked.into());
        }
        if token.is_expired(self.clock.now()) {
            return Err(TokenError::TokenExpired.into());
        }
        Ok(token)
    }

    /// Resolves the caller behind an access value that may be past its expiry.
    ///
    /// Signature, issuer and audience must still verify, the claims subject
    /// must match the stored owner, and the stored token must not be revoked.
    /// Used where a client legitimately presents a lapsed access value, such
    /// as exchanging its refresh value.
    pub async fn identify(&self, access_token: &str) -> Result<Token, DomainError> {
        let claims = match self.signer.verify(access_token) {
            Ok(claims) => claims,
            Err(TokenError::TokenExpired) => self.signer.verify_ignoring_expiry(access_token)?,
            Err(e) => return Err(e.into()),
        };
        let subject = claims.account_id().map_err(|_| TokenError::InvalidToken)?;
        let token = self.find_by_value(access_token).await?;

        if subject != token.account_id {
            debug!(token_id = %token.id, "Claims subject does not match stored owner");
            return Err(TokenError::InvalidToken.into());
        }
        if token.revoked {
            return Err(TokenError::TokenAlreadyRevoked.into());
        }
        Ok(token)
    }

    async fn resolve_account(&self, account_id: Uuid) -> Result<Account, DomainError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| TokenError::AccountNotFound.into())
    }
}

/// Position of the token to evict from a non-empty listing
fn eviction_index(owned: &[Token]) -> usize {
    owned.iter().position(|t| !t.is_mobile).unwrap_or(0)
}

fn generate_refresh_value() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
