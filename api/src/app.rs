//! Application factory
//!
//! Builds the actix-web application around already-constructed services so
//! the binary and the integration tests share the same routing.

use std::sync::Arc;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use orchid_core::{AccountRepository, TokenRepository};
use orchid_shared::{error_codes, CorsConfig, ErrorResponse};

use crate::middleware::{auth::JwtAuth, cors::create_cors, SessionAuthenticator};
use crate::routes::auth::{login::login, logout::logout, me::me, refresh::refresh, AppState};
use crate::routes::health::{health_check, HealthProbe};

/// Create and configure the application with all dependencies
pub fn create_app<T, A>(
    app_state: web::Data<AppState<T, A>>,
    cors_config: &CorsConfig,
    health_probe: Option<web::Data<dyn HealthProbe>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    T: TokenRepository + 'static,
    A: AccountRepository + 'static,
{
    let authenticator: Arc<dyn SessionAuthenticator> =
        app_state.auth_service.token_service().clone();

    let mut app = App::new().app_data(app_state).app_data(json_config());
    if let Some(probe) = health_probe {
        app = app.app_data(probe);
    }

    app
        // Outermost last: requests pass TracingLogger first, then CORS
        .wrap(create_cors(cors_config))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<T, A>))
                    .service(
                        web::resource("/refresh")
                            .wrap(JwtAuth::allow_expired(Arc::clone(&authenticator)))
                            .route(web::post().to(refresh::<T, A>)),
                    )
                    .service(
                        web::resource("/logout")
                            .wrap(JwtAuth::new(Arc::clone(&authenticator)))
                            .route(web::post().to(logout::<T, A>)),
                    )
                    .service(
                        web::resource("/me")
                            .wrap(JwtAuth::new(authenticator))
                            .route(web::get().to(me::<T, A>)),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Malformed JSON bodies get the shared error body instead of plain text
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
