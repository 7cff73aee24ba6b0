use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query parameters selecting the viewer whose channels are used.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewerQuery {
    /// Viewer whose registered channels are queried
    #[validate(length(min = 1, max = 128, message = "viewer_id must be between 1 and 128 characters"))]
    pub viewer_id: String,
}
