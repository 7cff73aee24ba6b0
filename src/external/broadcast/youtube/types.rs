use jiff::Timestamp;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideosResponse {
    pub items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Video {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// Variants from highest to lowest resolution.
    pub fn best_first(&self) -> [Option<&str>; 5] {
        [
            self.maxres.as_ref().map(|t| t.url.as_str()),
            self.standard.as_ref().map(|t| t.url.as_str()),
            self.high.as_ref().map(|t| t.url.as_str()),
            self.medium.as_ref().map(|t| t.url.as_str()),
            self.default.as_ref().map(|t| t.url.as_str()),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct Thumbnail {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LiveStreamingDetails {
    #[serde(default)]
    pub actual_start_time: Option<Timestamp>,
    #[serde(default)]
    pub actual_end_time: Option<Timestamp>,
    #[serde(default)]
    pub scheduled_start_time: Option<Timestamp>,
}
