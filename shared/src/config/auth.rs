//! Authentication and session-token configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// JWT audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 2_592_000,   // 30 days
            refresh_token_expiry: 5_184_000,  // 60 days
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Policy applied to issued session tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenPolicyConfig {
    /// Live tokens an account may hold before the oldest is evicted
    #[serde(default = "default_max_active_tokens")]
    pub max_active_tokens_per_account: usize,

    /// Reject refresh attempts from callers that do not own the token
    #[serde(default = "default_enforce_refresh_ownership")]
    pub enforce_refresh_ownership: bool,

    /// Seconds between sweeps of refresh-expired tokens (0 disables the sweep)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for TokenPolicyConfig {
    fn default() -> Self {
        Self {
            max_active_tokens_per_account: default_max_active_tokens(),
            enforce_refresh_ownership: default_enforce_refresh_ownership(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Session token policy
    #[serde(default)]
    pub tokens: TokenPolicyConfig,
}

impl AuthConfig {
    /// Get access token expiry in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.jwt.access_token_expiry
    }

    /// Get refresh token expiry in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.jwt.refresh_token_expiry
    }
}

fn default_issuer() -> String {
    String::from("orchid-shop")
}

fn default_audience() -> String {
    String::from("orchid-shop-api")
}

fn default_max_active_tokens() -> usize {
    3
}

fn default_enforce_refresh_ownership() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    3600
}
