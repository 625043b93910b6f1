use actix_web::{web, HttpResponse};

use orchid_core::{AccountRepository, TokenRepository};
use orchid_shared::ApiResponse;

use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the access value presented in the `Authorization` header. Other
/// sessions of the same account stay valid.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully",
///     "data": null
/// }
/// ```
pub async fn logout<T, A>(state: web::Data<AppState<T, A>>, auth: AuthContext) -> HttpResponse
where
    T: TokenRepository + 'static,
    A: AccountRepository + 'static,
{
    match state
        .auth_service
        .logout(&auth.access_token, auth.account_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success("Logged out successfully", ())),
        Err(error) => handle_domain_error(&error),
    }
}
