use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    pub database: String,
}

/// Liveness probe kept for existing clients: non-standard 234 with a fixed body.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 234, description = "Service is up", body = String)
    )
)]
pub async fn root() -> impl Responder {
    let status = StatusCode::from_u16(234).unwrap_or(StatusCode::OK);
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body("MERN Testing")
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (status, database, mut response) = match state.store.ping().await {
        Ok(()) => ("healthy", "connected".to_string(), HttpResponse::Ok()),
        Err(e) => {
            log::error!("❌ Health check failed: {}", e);
            ("unhealthy", e.to_string(), HttpResponse::ServiceUnavailable())
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database,
    })
}
