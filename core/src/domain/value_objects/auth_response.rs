//! Login result handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Account, Token};

/// A freshly issued token together with the account it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: Token,
    pub account: Account,
}

impl AuthResponse {
    pub fn new(token: Token, account: Account) -> Self {
        Self { token, account }
    }
}
