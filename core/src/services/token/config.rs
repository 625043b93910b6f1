//! Configuration for the token service

use chrono::Duration;
use orchid_shared::AuthConfig;

/// Default access token lifetime (30 days, in seconds)
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 2_592_000;

/// Default refresh token lifetime (60 days, in seconds)
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 5_184_000;

/// Default cap on tokens held by one account
pub const DEFAULT_MAX_ACTIVE_TOKENS: usize = 3;

/// Configuration for the token service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenServiceConfig {
    /// Lifetime of an access value
    pub access_token_ttl_seconds: i64,
    /// Lifetime of a refresh value
    pub refresh_token_ttl_seconds: i64,
    /// Tokens an account may hold before issuing evicts one
    pub max_active_tokens_per_account: usize,
    /// Reject refreshes from callers that do not own the token
    pub enforce_refresh_ownership: bool,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            max_active_tokens_per_account: DEFAULT_MAX_ACTIVE_TOKENS,
            enforce_refresh_ownership: true,
        }
    }
}

impl TokenServiceConfig {
    /// Build from the application's auth settings
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        Self {
            access_token_ttl_seconds: auth.access_token_expiry_seconds(),
            refresh_token_ttl_seconds: auth.refresh_token_expiry_seconds(),
            max_active_tokens_per_account: auth.tokens.max_active_tokens_per_account,
            enforce_refresh_ownership: auth.tokens.enforce_refresh_ownership,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_seconds)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.refresh_token_ttl_seconds)
    }

    /// The cap actually enforced; never below one so a new token always fits
    pub fn effective_cap(&self) -> usize {
        self.max_active_tokens_per_account.max(1)
    }
}
