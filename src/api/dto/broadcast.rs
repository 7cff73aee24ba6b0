//! Broadcast DTOs.
//!
//! Field names are camelCase to match the web frontend's existing contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ErrorKind;
use crate::external::broadcast::{NormalizedBroadcast, Platform};
use crate::services::{AggregationReport, PlatformFailure};

/// A broadcast in the unified schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "thumbnailUrl": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
    "title": "Weekly stream",
    "channelName": "Example Channel",
    "dateTime": "2024-01-01T12:00:00Z",
    "status": "live",
    "streamUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "videoId": "dQw4w9WgXcQ",
    "platform": "youtube"
}))]
pub struct BroadcastResponse {
    pub thumbnail_url: String,
    pub title: String,
    pub channel_name: String,
    /// RFC 3339 timestamp: end time when ended, start time when live,
    /// scheduled time when upcoming
    #[schema(format = DateTime)]
    pub date_time: String,
    /// One of `upcoming`, `live`, `ended`
    #[schema(example = "live")]
    pub status: String,
    pub stream_url: String,
    pub video_id: String,
    pub platform: Platform,
}

impl From<NormalizedBroadcast> for BroadcastResponse {
    fn from(broadcast: NormalizedBroadcast) -> Self {
        Self {
            thumbnail_url: broadcast.thumbnail_url,
            title: broadcast.title,
            channel_name: broadcast.channel_name,
            date_time: broadcast.timestamp.to_string(),
            status: broadcast.status.as_str().to_string(),
            stream_url: broadcast.watch_url,
            video_id: broadcast.video_id,
            platform: broadcast.platform,
        }
    }
}

/// A platform that failed during a partial aggregation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlatformFailureResponse {
    pub platform: Platform,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<PlatformFailure> for PlatformFailureResponse {
    fn from(failure: PlatformFailure) -> Self {
        Self {
            platform: failure.platform,
            kind: failure.kind,
            message: failure.message,
        }
    }
}

/// Records from the platforms that succeeded, plus one entry per failed platform.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AggregationReportResponse {
    pub broadcasts: Vec<BroadcastResponse>,
    pub failures: Vec<PlatformFailureResponse>,
}

impl From<AggregationReport> for AggregationReportResponse {
    fn from(report: AggregationReport) -> Self {
        Self {
            broadcasts: report.broadcasts.into_iter().map(Into::into).collect(),
            failures: report.failures.into_iter().map(Into::into).collect(),
        }
    }
}
