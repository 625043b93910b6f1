use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::info;

use orchid_api::app::create_app;
use orchid_api::routes::auth::AppState;
use orchid_api::routes::health::HealthProbe;
use orchid_api::telemetry::init_tracing;
use orchid_core::{
    AuthService, JwtSigner, TokenCleanupConfig, TokenService, TokenServiceConfig,
};
use orchid_infra::{DatabasePool, MySqlAccountRepository, MySqlTokenRepository};
use orchid_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!(environment = ?config.environment, "Starting orchid shop API server");

    let database = DatabasePool::new(config.database.clone()).await?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }

    let token_repository = Arc::new(MySqlTokenRepository::new(database.get_pool().clone()));
    let account_repository = Arc::new(MySqlAccountRepository::new(database.get_pool().clone()));

    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("Using the default JWT secret; set ORCHID__AUTH__JWT__SECRET");
    }
    let signer = Arc::new(JwtSigner::from_config(&config.auth.jwt));

    let token_service = Arc::new(TokenService::new(
        token_repository,
        Arc::clone(&account_repository),
        signer,
        TokenServiceConfig::from_auth_config(&config.auth),
    ));

    let cleanup_task = Arc::new(
        token_service.cleanup_service(TokenCleanupConfig::from_auth_config(&config.auth)),
    )
    .start_background_task();

    let auth_service = Arc::new(AuthService::new(account_repository, token_service));
    let app_state = web::Data::new(AppState::new(auth_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let probe: Arc<dyn HealthProbe> = Arc::new(database.clone());
    let health_probe = web::Data::from(probe);

    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), &cors_config, Some(health_probe.clone()))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    database.close().await;
    info!("Server stopped");
    Ok(())
}
