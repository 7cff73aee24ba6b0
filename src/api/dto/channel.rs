//! Registered channel DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::external::broadcast::Platform;
use crate::repositories::RegisteredChannel;

/// A channel registered for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub channel_id: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl From<RegisteredChannel> for ChannelResponse {
    fn from(channel: RegisteredChannel) -> Self {
        Self {
            channel_id: channel.channel_id,
            platform: channel.platform,
            channel_name: channel.display_name,
            thumbnail_url: channel.thumbnail_url,
        }
    }
}
