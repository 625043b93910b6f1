use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use orchid_core::{Account, AuthResponse, RoleName, Token};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    /// Overrides the `User-Agent` based mobile detection when present
    #[serde(default)]
    pub is_mobile: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Token as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access value expiry
    pub expires: DateTime<Utc>,
    pub expires_refresh_token: DateTime<Utc>,
    pub is_mobile: bool,
}

impl From<&Token> for TokenDto {
    fn from(token: &Token) -> Self {
        Self {
            id: token.id,
            access_token: token.token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_type: token.token_type.clone(),
            expires: token.expires_at,
            expires_refresh_token: token.refresh_expires_at,
            is_mobile: token.is_mobile,
        }
    }
}

impl From<Token> for TokenDto {
    fn from(token: Token) -> Self {
        Self::from(&token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: RoleName,
}

impl From<&Account> for AccountDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// Payload of a login or session lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: TokenDto,
    pub account: AccountDto,
}

impl From<AuthResponse> for LoginData {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: TokenDto::from(&response.token),
            account: AccountDto::from(&response.account),
        }
    }
}
