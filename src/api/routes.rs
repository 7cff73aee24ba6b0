//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode},
    middleware,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    error_response_middleware, logging_middleware, request_id_middleware,
};
use crate::config::settings::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests inside a span carrying the request ID
/// 3. Compression and CORS
/// 4. Error responses - normalizes error bodies and stamps the request ID;
///    it sits inside compression so it always sees uncompressed bodies
/// 5. Request timeout
///
/// # Routes
/// - `/api/streams`, `/api/streams/report` - Broadcast aggregation
/// - `/api/channels` - Registered channels
/// - `/health`, `/health/ready`, `/health/live` - Probes
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState, server: &ServerConfig) -> AppResult<Router> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::streams::stream_routes())
        .merge(handlers::channels::channel_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let router = router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout),
        ))
        .layer(middleware::from_fn(error_response_middleware))
        .layer(cors_layer(&server.cors_allowed_origins)?)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(router)
}

fn cors_layer(origins: &[String]) -> AppResult<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| AppError::Configuration {
                key: "server.cors_allowed_origins".to_string(),
                source: e.into(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS]))
}
