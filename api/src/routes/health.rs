use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use chrono::Utc;

use orchid_infra::DatabasePool;
use orchid_shared::{HealthResponse, HealthStatus};

/// Dependency whose reachability decides the health status
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for DatabasePool {
    async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

/// Handler for GET /health
///
/// 503 with `unhealthy` when a registered probe fails.
pub async fn health_check(probe: Option<web::Data<dyn HealthProbe>>) -> HttpResponse {
    let healthy = match probe {
        Some(probe) => probe.is_healthy().await,
        None => true,
    };

    let body = HealthResponse {
        status: if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
