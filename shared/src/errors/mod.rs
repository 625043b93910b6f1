//! Error envelope returned by every failing endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a non-2xx response.
///
/// `error` is one of [`error_codes`] and is stable for clients to match on;
/// `message` is for humans and may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach one entry under `details`; values that fail to serialize are dropped
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.details
                .get_or_insert_with(Map::new)
                .insert(key.into(), value);
        }
        self
    }
}

pub mod error_codes {
    // generic
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

    // sessions
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const ACCOUNT_NOT_FOUND: &str = "ACCOUNT_NOT_FOUND";
    pub const TOKEN_NOT_FOUND: &str = "TOKEN_NOT_FOUND";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
    pub const TOKEN_OWNERSHIP_MISMATCH: &str = "TOKEN_OWNERSHIP_MISMATCH";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_are_collected_per_field() {
        let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body")
            .add_detail("email", vec!["email"])
            .add_detail("password", vec!["length"]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["email"][0], "email");
        assert_eq!(json["details"]["password"][0], "length");
    }

    #[test]
    fn test_details_key_absent_when_empty() {
        let json =
            serde_json::to_value(ErrorResponse::new(error_codes::NOT_FOUND, "missing")).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("timestamp").is_some());
    }
}
