//! Session token entity and the JWT payload carried by its access value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;

/// The only token type this system issues
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// One issued session credential.
///
/// `token` is the signed access value and `refresh_token` the opaque value
/// exchanged for a new access value. Both are unique across all tokens.
/// Expiry is never stored as a flag; it is computed against a clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier, fixed at construction
    pub id: Uuid,

    /// Owning account, never changes after construction
    pub account_id: Uuid,

    /// Signed access value
    pub token: String,

    /// Opaque refresh value, rotated on every refresh
    pub refresh_token: String,

    pub token_type: String,

    /// When the access value stops being accepted
    pub expires_at: DateTime<Utc>,

    /// When the refresh value stops being accepted
    pub refresh_expires_at: DateTime<Utc>,

    /// Set at issuance; only used to pick an eviction victim
    pub is_mobile: bool,

    /// Once true, stays true
    pub revoked: bool,

    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Builds a fresh, unrevoked token issued at `now`
    pub fn new(
        account_id: Uuid,
        token: String,
        refresh_token: String,
        is_mobile: bool,
        now: DateTime<Utc>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at: now + access_ttl,
            refresh_expires_at: now + refresh_ttl,
            is_mobile,
            revoked: false,
            created_at: now,
        }
    }

    /// Replaces both values and pushes both expiries forward from `now`
    pub fn rotate(
        &mut self,
        token: String,
        refresh_token: String,
        now: DateTime<Utc>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) {
        self.token = token;
        self.refresh_token = refresh_token;
        self.expires_at = now + access_ttl;
        self.refresh_expires_at = now + refresh_ttl;
    }

    /// Marks the token as revoked
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Whether the access value has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the refresh value has expired at `now`
    pub fn is_refresh_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.refresh_expires_at
    }

    /// Usable for authorization: not revoked and not expired
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }

    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.account_id == account_id
    }
}

/// Claims structure for the JWT access value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    pub email: String,

    /// Upper-case role name
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, unique per signature
    pub jti: String,
}

impl Claims {
    /// Creates claims for `account` valid from `now` for `ttl`
    pub fn for_account(
        account: &Account,
        now: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: account.id.to_string(),
            email: account.email.clone(),
            role: account.role.as_str().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the account ID from the claims
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
