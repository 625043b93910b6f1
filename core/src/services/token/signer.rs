//! Producing and checking signed access values

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use orchid_shared::JwtConfig;

use crate::domain::entities::{Account, Claims};
use crate::errors::TokenError;

/// Signs access values for accounts and verifies them later
pub trait TokenSigner: Send + Sync {
    /// Produce a signed value for `account`, valid from `issued_at` until `expires_at`
    fn sign(
        &self,
        account: &Account,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError>;

    /// Check the signature and registered claims of a presented value
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;

    /// Like [`TokenSigner::verify`] but accepts a value whose `exp` has passed
    fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 JWT signer
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lapsed_validation: Validation,
    issuer: String,
    audience: String,
}

impl JwtSigner {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let mut lapsed_validation = validation.clone();
        lapsed_validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lapsed_validation,
            issuer,
            audience,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, config.issuer.clone(), config.audience.clone())
    }
}

impl TokenSigner for JwtSigner {
    fn sign(
        &self,
        account: &Account,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::for_account(
            account,
            issued_at,
            expires_at - issued_at,
            &self.issuer,
            &self.audience,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, account_id = %account.id, "Failed to sign access token");
            TokenError::SigningFailed
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode_with(token, &self.decoding_key, &self.validation)
    }

    fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, TokenError> {
        decode_with(token, &self.decoding_key, &self.lapsed_validation)
    }
}

fn decode_with(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, TokenError> {
    decode::<Claims>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            _ => TokenError::InvalidToken,
        })
}
