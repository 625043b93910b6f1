//! Mapping of domain failures onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use validator::ValidationErrors;

use orchid_core::{AuthError, DomainError, TokenError};
use orchid_shared::{error_codes, ErrorResponse};

/// Errors raised before a handler runs, rendered with the shared error body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    /// A presented credential was refused; always 401 unless the lookup itself failed
    #[error(transparent)]
    Rejected(DomainError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected(error) => rejection_status(error),
            ApiError::Domain(error) => error_parts(error).0,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Unauthorized(message) => HttpResponse::Unauthorized()
                .json(ErrorResponse::new(error_codes::UNAUTHORIZED, *message)),
            ApiError::Rejected(error) => {
                let (_, code, message) = error_parts(error);
                HttpResponse::build(rejection_status(error)).json(ErrorResponse::new(code, message))
            }
            ApiError::Domain(error) => handle_domain_error(error),
        }
    }
}

fn rejection_status(error: &DomainError) -> StatusCode {
    match error_parts(error).0 {
        status if status.is_server_error() => status,
        _ => StatusCode::UNAUTHORIZED,
    }
}

/// Status, error code and client-facing message for a domain error
fn error_parts(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_CREDENTIALS,
            "Invalid email or password".to_string(),
        ),
        DomainError::Token(token_error) => match token_error {
            TokenError::AccountNotFound => (
                StatusCode::NOT_FOUND,
                error_codes::ACCOUNT_NOT_FOUND,
                token_error.to_string(),
            ),
            TokenError::TokenNotFound => (
                StatusCode::NOT_FOUND,
                error_codes::TOKEN_NOT_FOUND,
                token_error.to_string(),
            ),
            TokenError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_EXPIRED,
                token_error.to_string(),
            ),
            TokenError::TokenAlreadyRevoked => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_REVOKED,
                token_error.to_string(),
            ),
            TokenError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_INVALID,
                token_error.to_string(),
            ),
            TokenError::TokenOwnershipMismatch => (
                StatusCode::FORBIDDEN,
                error_codes::TOKEN_OWNERSHIP_MISMATCH,
                token_error.to_string(),
            ),
            TokenError::SigningFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "An internal error occurred".to_string(),
            ),
        },
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        ),
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code, message) = error_parts(error);

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
    }

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// 400 response listing the failing fields of a request body
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body");

    for (field, field_errors) in errors.field_errors() {
        let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
        response = response.add_detail(field, codes);
    }

    HttpResponse::BadRequest().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_statuses() {
        let cases = [
            (TokenError::TokenNotFound, StatusCode::NOT_FOUND),
            (TokenError::AccountNotFound, StatusCode::NOT_FOUND),
            (TokenError::TokenExpired, StatusCode::UNAUTHORIZED),
            (TokenError::TokenAlreadyRevoked, StatusCode::UNAUTHORIZED),
            (TokenError::InvalidToken, StatusCode::UNAUTHORIZED),
            (TokenError::TokenOwnershipMismatch, StatusCode::FORBIDDEN),
            (TokenError::SigningFailed, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            let response = handle_domain_error(&DomainError::Token(error.clone()));
            assert_eq!(response.status(), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let error = DomainError::internal("connection refused at 10.0.0.3");
        let (status, code, message) = error_parts(&error);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, error_codes::INTERNAL_ERROR);
        assert!(!message.contains("10.0.0.3"));
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let error = DomainError::Auth(AuthError::InvalidCredentials);
        assert_eq!(
            ApiError::Domain(error).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized("Missing bearer token").status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_rejected_credentials_are_unauthorized() {
        let unknown = ApiError::Rejected(DomainError::Token(TokenError::TokenNotFound));
        assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);

        let broken_store = ApiError::Rejected(DomainError::internal("pool timed out"));
        assert_eq!(broken_store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
