use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::try_join_all;

use super::types::{SearchResponse, Video, VideosResponse};
use crate::config::settings::YoutubeConfig;
use crate::error::{AppError, AppResult};
use crate::external::broadcast::platform::Platform;
use crate::external::broadcast::provider::BroadcastProvider;
use crate::external::broadcast::types::{BroadcastTiming, NormalizedBroadcast, resolve_thumbnail};
use crate::external::client::send_json;

/// Maximum number of ids accepted by one `videos` call.
const VIDEOS_BATCH_SIZE: usize = 50;

/// API key header; the key is never placed in the query string.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// YouTube Data API v3 client.
///
/// Candidates come from one `search` call per channel; lifecycle metadata
/// comes from `videos?part=snippet,liveStreamingDetails`.
pub struct YoutubeClient {
    http: reqwest::Client,
    config: YoutubeConfig,
}

impl YoutubeClient {
    pub fn new(http: reqwest::Client, config: YoutubeConfig) -> Self {
        Self { http, config }
    }

    /// Canonical watch URL for a video id.
    pub fn watch_url(base_url: &str, video_id: &str) -> String {
        format!("{}/watch?v={}", base_url.trim_end_matches('/'), video_id)
    }

    fn api_key(&self) -> AppResult<&str> {
        let key = self.config.api_key.trim();
        if key.is_empty() {
            return Err(AppError::PlatformAuth {
                platform: Platform::Youtube,
                message: "API key is not configured".into(),
            });
        }
        Ok(key)
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), name)
    }

    async fn search_channel(&self, key: &str, channel_id: &str) -> AppResult<Vec<String>> {
        let max_results = self.config.search_max_results.to_string();
        let request = self
            .http
            .get(self.endpoint("search"))
            .header(API_KEY_HEADER, key)
            .query(&[
                ("part", "id"),
                ("channelId", channel_id),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", max_results.as_str()),
            ]);

        let data: SearchResponse = send_json(
            Platform::Youtube,
            &format!("search({})", channel_id),
            request,
        )
        .await?;

        Ok(data
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    async fn fetch_videos(&self, key: &str, video_ids: &[String]) -> AppResult<Vec<Video>> {
        let mut videos = Vec::with_capacity(video_ids.len());
        for batch in video_ids.chunks(VIDEOS_BATCH_SIZE) {
            let ids = batch.join(",");
            let request = self
                .http
                .get(self.endpoint("videos"))
                .header(API_KEY_HEADER, key)
                .query(&[("part", "snippet,liveStreamingDetails"), ("id", ids.as_str())]);
            let data: VideosResponse = send_json(Platform::Youtube, "videos", request).await?;
            videos.extend(data.items);
        }
        Ok(videos)
    }

    fn normalize(&self, video: Video) -> Option<NormalizedBroadcast> {
        let details = video.live_streaming_details.unwrap_or_default();
        let timing = BroadcastTiming {
            actual_end: details.actual_end_time,
            actual_start: details.actual_start_time,
            scheduled_start: details.scheduled_start_time,
        };

        let Some((status, timestamp)) = timing.classify() else {
            tracing::debug!(video_id = %video.id, "Skipping video without live streaming details");
            return None;
        };

        Some(NormalizedBroadcast {
            thumbnail_url: resolve_thumbnail(video.snippet.thumbnails.best_first()),
            title: video.snippet.title,
            channel_name: video.snippet.channel_title,
            timestamp,
            status,
            watch_url: Self::watch_url(&self.config.watch_base_url, &video.id),
            video_id: video.id,
            platform: Platform::Youtube,
        })
    }
}

#[async_trait]
impl BroadcastProvider for YoutubeClient {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn has_credentials(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    async fn fetch_broadcasts(&self, channel_ids: &[String]) -> AppResult<Vec<NormalizedBroadcast>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.api_key()?;

        let per_channel = try_join_all(
            channel_ids
                .iter()
                .map(|channel_id| self.search_channel(key, channel_id)),
        )
        .await?;

        let mut seen = HashSet::new();
        let video_ids: Vec<String> = per_channel
            .into_iter()
            .flatten()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        tracing::debug!(
            channels = channel_ids.len(),
            candidates = video_ids.len(),
            "YouTube search completed"
        );

        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let broadcasts: Vec<NormalizedBroadcast> = self
            .fetch_videos(key, &video_ids)
            .await?
            .into_iter()
            .filter_map(|video| self.normalize(video))
            .collect();

        tracing::debug!(count = broadcasts.len(), "YouTube broadcasts normalized");
        Ok(broadcasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::broadcast::types::BroadcastStatus;
    use serde_json::json;
    use wiremock::matchers::{any, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: &str) -> YoutubeClient {
        YoutubeClient::new(
            reqwest::Client::new(),
            YoutubeConfig {
                api_key: api_key.to_string(),
                api_base_url: server.uri(),
                ..Default::default()
            },
        )
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    async fn mount_search(server: &MockServer, channel_id: &str, video_ids: &[&str]) {
        let items: Vec<_> = video_ids
            .iter()
            .map(|id| json!({"kind": "youtube#searchResult", "id": {"kind": "youtube#video", "videoId": id}}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("channelId", channel_id))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_platform_returns_youtube() {
        let client = YoutubeClient::new(reqwest::Client::new(), YoutubeConfig::default());
        assert_eq!(client.platform(), Platform::Youtube);
        assert!(!client.has_credentials());
    }

    #[test]
    fn test_watch_url_is_deterministic() {
        assert_eq!(
            YoutubeClient::watch_url("https://www.youtube.com/", "dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            YoutubeClient::watch_url("https://www.youtube.com", "abc"),
            YoutubeClient::watch_url("https://www.youtube.com", "abc")
        );
    }

    #[tokio::test]
    async fn test_empty_channels_makes_no_requests() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        // No key configured either: the empty-input check comes first.
        let client = client_for(&server, "");
        let result = client.fetch_broadcasts(&[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, "   ");
        let err = client.fetch_broadcasts(&ids(&["UC1"])).await.unwrap_err();
        assert!(matches!(err, AppError::PlatformAuth { platform: Platform::Youtube, .. }));
    }

    #[tokio::test]
    async fn test_fetch_normalizes_and_preserves_details_order() {
        let server = MockServer::start().await;
        mount_search(&server, "UC1", &["v-live", "v-upcoming"]).await;
        mount_search(&server, "UC2", &["v-ended", "v-plain", "v-live"]).await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "v-live,v-upcoming,v-ended,v-plain"))
            .and(query_param("part", "snippet,liveStreamingDetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "v-ended",
                        "snippet": {
                            "title": "Finished",
                            "channelTitle": "Channel Two",
                            "thumbnails": {
                                "default": {"url": "https://i.ytimg.com/ended/default.jpg"},
                                "medium": {"url": "https://i.ytimg.com/ended/mq.jpg"}
                            }
                        },
                        "liveStreamingDetails": {
                            "scheduledStartTime": "2025-03-01T10:00:00Z",
                            "actualStartTime": "2025-03-01T10:01:00Z",
                            "actualEndTime": "2025-03-01T12:00:00Z"
                        }
                    },
                    {
                        "id": "v-live",
                        "snippet": {
                            "title": "Live now",
                            "channelTitle": "Channel One",
                            "thumbnails": {
                                "high": {"url": "https://i.ytimg.com/live/hq.jpg"},
                                "maxres": {"url": "https://i.ytimg.com/live/maxres.jpg"}
                            }
                        },
                        "liveStreamingDetails": {"actualStartTime": "2025-03-02T09:30:00Z"}
                    },
                    {
                        "id": "v-plain",
                        "snippet": {"title": "Regular upload", "channelTitle": "Channel Two", "thumbnails": {}}
                    },
                    {
                        "id": "v-upcoming",
                        "snippet": {"title": "Soon", "channelTitle": "Channel One"},
                        "liveStreamingDetails": {"scheduledStartTime": "2025-03-05T18:00:00Z"}
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "test-key");
        let result = client.fetch_broadcasts(&ids(&["UC1", "UC2"])).await.unwrap();

        assert_eq!(result.len(), 3, "the plain upload is dropped");

        assert_eq!(result[0].video_id, "v-ended");
        assert_eq!(result[0].status, BroadcastStatus::Ended);
        assert_eq!(result[0].timestamp.to_string(), "2025-03-01T12:00:00Z");
        assert_eq!(result[0].thumbnail_url, "https://i.ytimg.com/ended/mq.jpg");

        assert_eq!(result[1].video_id, "v-live");
        assert_eq!(result[1].status, BroadcastStatus::Live);
        assert_eq!(result[1].timestamp.to_string(), "2025-03-02T09:30:00Z");
        assert_eq!(result[1].thumbnail_url, "https://i.ytimg.com/live/maxres.jpg");
        assert_eq!(result[1].watch_url, "https://www.youtube.com/watch?v=v-live");
        assert_eq!(result[1].channel_name, "Channel One");

        assert_eq!(result[2].video_id, "v-upcoming");
        assert_eq!(result[2].status, BroadcastStatus::Upcoming);
        assert_eq!(result[2].timestamp.to_string(), "2025-03-05T18:00:00Z");
        assert_eq!(result[2].thumbnail_url, "");

        assert!(result.iter().all(|b| b.platform == Platform::Youtube));
    }

    #[tokio::test]
    async fn test_no_search_hits_skips_details_query() {
        let server = MockServer::start().await;
        mount_search(&server, "UC1", &[]).await;
        Mock::given(path("/videos"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, "test-key");
        let result = client.fetch_broadcasts(&ids(&["UC1"])).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_forbidden_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "quotaExceeded"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "test-key");
        let err = client.fetch_broadcasts(&ids(&["UC1"])).await.unwrap_err();
        match err {
            AppError::Upstream { platform, status, .. } => {
                assert_eq!(platform, Platform::Youtube);
                assert_eq!(status, Some(403));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_videos_body_is_decode_error() {
        let server = MockServer::start().await;
        mount_search(&server, "UC1", &["v1"]).await;
        Mock::given(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "v1", "snippet": {}, "liveStreamingDetails": {"actualStartTime": "yesterday"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "test-key");
        let err = client.fetch_broadcasts(&ids(&["UC1"])).await.unwrap_err();
        assert!(matches!(err, AppError::Decode { platform: Platform::Youtube, .. }), "got {:?}", err);
    }

    fn live_video(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "snippet": {"title": id, "channelTitle": "Batch Channel"},
            "liveStreamingDetails": {"actualStartTime": "2025-03-02T09:30:00Z"}
        })
    }

    #[tokio::test]
    async fn test_details_are_requested_in_batches_of_fifty() {
        let server = MockServer::start().await;
        let first: Vec<String> = (0..30).map(|i| format!("v{:02}", i)).collect();
        let second: Vec<String> = (30..53).map(|i| format!("v{:02}", i)).collect();
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();
        let second_refs: Vec<&str> = second.iter().map(String::as_str).collect();
        mount_search(&server, "UC1", &first_refs).await;
        mount_search(&server, "UC2", &second_refs).await;

        let all: Vec<String> = first.iter().chain(second.iter()).cloned().collect();
        let (head, tail) = all.split_at(VIDEOS_BATCH_SIZE);

        for batch in [head, tail] {
            let items: Vec<_> = batch.iter().map(|id| live_video(id)).collect();
            Mock::given(method("GET"))
                .and(path("/videos"))
                .and(header(API_KEY_HEADER, "test-key"))
                .and(query_param("id", batch.join(",")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server, "test-key");
        let result = client.fetch_broadcasts(&ids(&["UC1", "UC2"])).await.unwrap();

        assert_eq!(tail.len(), 3);
        let returned: Vec<&str> = result.iter().map(|b| b.video_id.as_str()).collect();
        let expected: Vec<&str> = all.iter().map(String::as_str).collect();
        assert_eq!(returned, expected);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_expose_api_key() {
        let client = YoutubeClient::new(
            reqwest::Client::new(),
            YoutubeConfig {
                api_key: "SUPER-SECRET-KEY".into(),
                api_base_url: "http://127.0.0.1:1".into(),
                ..Default::default()
            },
        );

        let err = client.fetch_broadcasts(&ids(&["UC1"])).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { platform: Platform::Youtube, .. }), "got {:?}", err);
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{:?}", err).contains("SUPER-SECRET-KEY"));
    }

    #[tokio::test]
    #[ignore = "requires network access and YOUTUBE_API_KEY"]
    async fn test_fetch_broadcasts_real_api() {
        let key = std::env::var("YOUTUBE_API_KEY").unwrap_or_default();
        let client = YoutubeClient::new(
            reqwest::Client::new(),
            YoutubeConfig {
                api_key: key,
                ..Default::default()
            },
        );
        let result = client
            .fetch_broadcasts(&ids(&["UC4R8DWoMoI7CAwX8_LjQHig"]))
            .await;
        assert!(result.is_ok());
    }
}
