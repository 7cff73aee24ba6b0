//! Registered channel handlers.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CHANNELS_TAG;
use crate::api::dto::{ChannelResponse, ErrorResponse, ViewerQuery};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;

/// Register channel routes.
pub fn channel_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_channels))
}

/// GET /api/channels - Channels registered for a viewer.
#[utoipa::path(
    get,
    path = "/api/channels",
    tag = CHANNELS_TAG,
    params(ViewerQuery),
    responses(
        (status = 200, description = "Registered channels", body = Vec<ChannelResponse>),
        (status = 400, description = "Invalid viewer id", body = ErrorResponse),
        (status = 404, description = "Viewer is not registered", body = ErrorResponse)
    )
)]
async fn list_channels(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ViewerQuery>,
) -> AppResult<Json<Vec<ChannelResponse>>> {
    let channels = state.services.channels.list(&query.viewer_id).await?;
    Ok(Json(channels.into_iter().map(Into::into).collect()))
}
