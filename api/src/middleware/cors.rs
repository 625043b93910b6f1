//! CORS configuration for browser and mobile web clients.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use orchid_shared::CorsConfig;

/// Creates the CORS middleware from configuration.
///
/// An origin list containing `*` accepts any origin; otherwise only the
/// listed origins are allowed.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::USER_AGENT,
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring CORS to accept any origin");
        return cors.allow_any_origin();
    }

    for origin in config
        .allowed_origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
    {
        tracing::info!(origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}
