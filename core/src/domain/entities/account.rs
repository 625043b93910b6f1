//! Account entity as read from the identity store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    Staff,
    User,
    Manager,
    Admin,
}

impl RoleName {
    /// Upper-case wire name, as stored and as carried in claims
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Staff => "STAFF",
            RoleName::User => "USER",
            RoleName::Manager => "MANAGER",
            RoleName::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STAFF" => Ok(RoleName::Staff),
            "USER" => Ok(RoleName::User),
            "MANAGER" => Ok(RoleName::Manager),
            "ADMIN" => Ok(RoleName::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A shop account that can hold session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Login email, unique across accounts
    pub email: String,

    /// Bcrypt hash of the password; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: RoleName,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with an already-hashed password
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: RoleName,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// Hashes `password` with bcrypt and builds the account around it
    pub fn with_password(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        role: RoleName,
    ) -> Result<Self, bcrypt::BcryptError> {
        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        Ok(Self::new(name, email, hash, role))
    }

    /// Checks a plaintext password against the stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
