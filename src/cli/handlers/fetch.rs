//! Fetch command handler
//!
//! Runs one aggregation in process and prints the JSON result to stdout,
//! in the same shape the HTTP endpoints return.

use crate::api::dto::{AggregationReportResponse, BroadcastResponse};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Handler for the fetch command
pub struct FetchCommandHandler {
    state: AppState,
}

impl FetchCommandHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn execute(&self, viewer_id: &str, partial: bool, pretty: bool) -> AppResult<()> {
        let output = self.render(viewer_id, partial, pretty).await?;
        println!("{}", output);
        Ok(())
    }

    /// Aggregate and serialize.
    ///
    /// Without `partial` the first platform failure aborts the command, as
    /// `GET /api/streams` does.
    pub async fn render(&self, viewer_id: &str, partial: bool, pretty: bool) -> AppResult<String> {
        let broadcasts = &self.state.services.broadcasts;
        let value = if partial {
            let report: AggregationReportResponse =
                broadcasts.aggregate_partial(viewer_id).await?.into();
            serde_json::to_value(report)
        } else {
            let items: Vec<BroadcastResponse> = broadcasts
                .aggregate(viewer_id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            serde_json::to_value(items)
        }
        .map_err(internal)?;

        let output = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        output.map_err(internal)
    }
}

fn internal(e: serde_json::Error) -> AppError {
    AppError::Internal { source: e.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::broadcast::{
        BroadcastProvider, BroadcastStatus, NormalizedBroadcast, Platform, ProviderRegistry,
    };
    use crate::repositories::{RegisteredChannel, Repositories, StaticChannelDirectory};
    use crate::services::Services;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct OneLive;

    #[async_trait]
    impl BroadcastProvider for OneLive {
        fn platform(&self) -> Platform {
            Platform::Youtube
        }

        fn has_credentials(&self) -> bool {
            true
        }

        async fn fetch_broadcasts(&self, channel_ids: &[String]) -> AppResult<Vec<NormalizedBroadcast>> {
            Ok(vec![NormalizedBroadcast {
                thumbnail_url: "https://i.ytimg.com/vi/abc/hqdefault.jpg".into(),
                title: "Launch".into(),
                channel_name: channel_ids[0].clone(),
                timestamp: "2024-06-01T09:00:00Z".parse().unwrap(),
                status: BroadcastStatus::Live,
                watch_url: "https://www.youtube.com/watch?v=abc".into(),
                video_id: "abc".into(),
                platform: Platform::Youtube,
            }])
        }
    }

    fn handler() -> FetchCommandHandler {
        let mut viewers = HashMap::new();
        viewers.insert(
            "viewer-1".to_string(),
            vec![
                RegisteredChannel::new("UC1", Platform::Youtube),
                RegisteredChannel::new("1001", Platform::Twitch),
            ],
        );
        let repos = Repositories::new(Arc::new(StaticChannelDirectory::new(viewers)));
        let providers = ProviderRegistry::new().with_provider(Arc::new(OneLive));
        FetchCommandHandler::new(AppState::from_services(Services::new(repos, providers)))
    }

    #[tokio::test]
    async fn test_all_or_nothing_fails_on_missing_client() {
        let err = handler().render("viewer-1", false, false).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::PlatformAuth {
                platform: Platform::Twitch,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_partial_reports_failed_platform() {
        let output = handler().render("viewer-1", true, false).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["broadcasts"][0]["videoId"], "abc");
        assert_eq!(value["failures"][0]["platform"], "twitch");
        assert_eq!(value["failures"][0]["kind"], "auth");
        assert!(!output.contains('\n'));
    }

    #[tokio::test]
    async fn test_pretty_output_is_indented() {
        let output = handler().render("viewer-1", true, true).await.unwrap();
        assert!(output.contains("\n  \"broadcasts\""));
    }
}
