//! Broadcast aggregation handlers.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::STREAMS_TAG;
use crate::api::dto::{AggregationReportResponse, BroadcastResponse, ErrorResponse, ViewerQuery};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;

/// Register stream routes.
pub fn stream_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_streams))
        .routes(routes!(stream_report))
}

/// GET /api/streams - Broadcasts from every registered channel.
///
/// All-or-nothing: if any platform fails, the request fails with that
/// platform's error and no broadcasts are returned.
#[utoipa::path(
    get,
    path = "/api/streams",
    tag = STREAMS_TAG,
    params(ViewerQuery),
    responses(
        (status = 200, description = "Broadcasts from all platforms", body = Vec<BroadcastResponse>),
        (status = 400, description = "Invalid viewer id", body = ErrorResponse),
        (status = 404, description = "Viewer is not registered", body = ErrorResponse),
        (status = 500, description = "Platform credentials missing or rejected", body = ErrorResponse),
        (status = 502, description = "A platform API failed", body = ErrorResponse),
        (status = 503, description = "Channel directory unavailable", body = ErrorResponse)
    )
)]
async fn list_streams(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ViewerQuery>,
) -> AppResult<Json<Vec<BroadcastResponse>>> {
    let broadcasts = state
        .services
        .broadcasts
        .aggregate(&query.viewer_id)
        .await?;
    Ok(Json(broadcasts.into_iter().map(Into::into).collect()))
}

/// GET /api/streams/report - Broadcasts plus per-platform failures.
///
/// Platforms that succeed contribute their broadcasts; each failed platform
/// is listed in `failures` instead of failing the request.
#[utoipa::path(
    get,
    path = "/api/streams/report",
    tag = STREAMS_TAG,
    params(ViewerQuery),
    responses(
        (status = 200, description = "Partial aggregation report", body = AggregationReportResponse),
        (status = 400, description = "Invalid viewer id", body = ErrorResponse),
        (status = 404, description = "Viewer is not registered", body = ErrorResponse),
        (status = 503, description = "Channel directory unavailable", body = ErrorResponse)
    )
)]
async fn stream_report(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ViewerQuery>,
) -> AppResult<Json<AggregationReportResponse>> {
    let report = state
        .services
        .broadcasts
        .aggregate_partial(&query.viewer_id)
        .await?;
    Ok(Json(report.into()))
}
