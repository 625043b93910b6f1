use actix_web::{web, HttpResponse};
use validator::Validate;

use orchid_core::{AccountRepository, TokenRepository};
use orchid_shared::ApiResponse;

use crate::dto::auth::{RefreshTokenRequest, TokenDto};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh value for new access and refresh values on the same
/// token. The bearer access value may already be past its expiry.
///
/// ## Errors
/// - 401 Unauthorized: Missing bearer, or refresh value expired (the token is deleted)
/// - 403 Forbidden: Refresh value belongs to another account
/// - 404 Not Found: Unknown or already-rotated refresh value
pub async fn refresh<T, A>(
    state: web::Data<AppState<T, A>>,
    auth: AuthContext,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    T: TokenRepository + 'static,
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .auth_service
        .refresh(&request.refresh_token, auth.account_id)
        .await
    {
        Ok(token) => HttpResponse::Ok().json(ApiResponse::success(
            "Token refreshed",
            TokenDto::from(token),
        )),
        Err(error) => handle_domain_error(&error),
    }
}
