//! Health check endpoint handlers.
//!
//! The service has no database; readiness is about whether each streaming
//! platform can be queried, i.e. whether its credentials are configured.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::external::broadcast::Platform;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use std::collections::HashMap;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Per-platform credential report
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Basic health check endpoint.
///
/// `healthy` when every platform has credentials, `degraded` when only some
/// do, `unhealthy` when none do.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "No platform can be queried", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = build_health(&state.services.providers.credential_status());
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (status, Json(response))
}

/// Readiness probe endpoint.
///
/// Ready only when every platform has credentials.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match build_health(&state.services.providers.credential_status()).status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn build_health(credentials: &[(Platform, bool)]) -> HealthResponse {
    let checks: HashMap<String, ComponentHealth> = credentials
        .iter()
        .map(|(platform, configured)| {
            let check = if *configured {
                ComponentHealth {
                    status: HealthStatus::Healthy,
                    message: Some("Credentials configured".to_string()),
                }
            } else {
                ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    message: Some("Credentials missing".to_string()),
                }
            };
            (platform.to_string(), check)
        })
        .collect();

    let configured = credentials.iter().filter(|(_, ok)| *ok).count();
    let status = if configured == credentials.len() && !credentials.is_empty() {
        HealthStatus::Healthy
    } else if configured > 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unhealthy
    };

    HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    }
}
