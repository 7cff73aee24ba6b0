use utoipa::OpenApi;

pub const STREAMS_TAG: &str = "Streams";
pub const CHANNELS_TAG: &str = "Channels";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stream Scheduler",
        description = "Merged YouTube and Twitch broadcast schedules for a viewer's channels",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ErrorKind,
            crate::error::ValidationFieldError,
            crate::external::broadcast::Platform,
        )
    ),
    tags(
        (name = STREAMS_TAG, description = "Broadcast aggregation endpoints"),
        (name = CHANNELS_TAG, description = "Registered channel endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
