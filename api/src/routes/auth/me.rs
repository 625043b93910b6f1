use actix_web::{web, HttpResponse};

use orchid_core::{AccountRepository, TokenRepository};
use orchid_shared::ApiResponse;

use crate::dto::auth::LoginData;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
pub async fn me<T, A>(state: web::Data<AppState<T, A>>, auth: AuthContext) -> HttpResponse
where
    T: TokenRepository + 'static,
    A: AccountRepository + 'static,
{
    match state.auth_service.current_session(&auth.access_token).await {
        Ok(session) => HttpResponse::Ok().json(ApiResponse::success(
            "Current session",
            LoginData::from(session),
        )),
        Err(error) => handle_domain_error(&error),
    }
}
