use async_trait::async_trait;

use super::types::{StreamData, StreamsResponse, TokenResponse};
use crate::config::settings::TwitchConfig;
use crate::error::{AppError, AppResult};
use crate::external::broadcast::platform::Platform;
use crate::external::broadcast::provider::BroadcastProvider;
use crate::external::broadcast::types::{
    BroadcastTiming, NormalizedBroadcast, expand_thumbnail_template,
};
use crate::external::client::send_json;

/// Twitch Helix client.
///
/// Helix only reports streams that are live right now, so every record is
/// classified `live` at its `started_at` time.
pub struct TwitchClient {
    http: reqwest::Client,
    config: TwitchConfig,
}

impl TwitchClient {
    pub fn new(http: reqwest::Client, config: TwitchConfig) -> Self {
        Self { http, config }
    }

    /// Canonical watch URL for a broadcaster login.
    pub fn watch_url(base_url: &str, login: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), login)
    }

    fn make_upstream_error(
        message: impl Into<String>,
        status: Option<u16>,
        source: Option<anyhow::Error>,
    ) -> AppError {
        AppError::Upstream {
            platform: Platform::Twitch,
            status,
            message: message.into(),
            source,
        }
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let client_id = self.config.client_id.trim();
        let client_secret = self.config.client_secret.trim();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AppError::PlatformAuth {
                platform: Platform::Twitch,
                message: "client id/secret are not configured".into(),
            });
        }
        Ok((client_id, client_secret))
    }

    /// Exchange client credentials for an app access token.
    ///
    /// Every failure here is reported as upstream, including an empty token
    /// in an otherwise successful response.
    async fn app_access_token(&self, client_id: &str, client_secret: &str) -> AppResult<String> {
        let url = format!("{}/token", self.config.auth_base_url.trim_end_matches('/'));
        let request = self.http.post(url).form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ]);

        let token: TokenResponse = send_json(Platform::Twitch, "token", request)
            .await
            .map_err(|e| match e {
                AppError::Decode { message, source, .. } => {
                    Self::make_upstream_error(message, None, source)
                }
                other => other,
            })?;

        if token.access_token.trim().is_empty() {
            return Err(Self::make_upstream_error(
                "token exchange returned an empty access token",
                None,
                None,
            ));
        }

        tracing::debug!(expires_in = token.expires_in, "Twitch app access token acquired");
        Ok(token.access_token)
    }

    async fn fetch_streams(
        &self,
        client_id: &str,
        token: &str,
        channel_ids: &[String],
    ) -> AppResult<Vec<StreamData>> {
        let url = format!("{}/streams", self.config.api_base_url.trim_end_matches('/'));
        let first = self.config.max_results.to_string();

        let mut params: Vec<(&str, &str)> = channel_ids
            .iter()
            .map(|id| ("user_id", id.as_str()))
            .collect();
        params.push(("first", first.as_str()));

        let request = self
            .http
            .get(url)
            .query(&params)
            .bearer_auth(token)
            .header("Client-Id", client_id);

        let data: StreamsResponse = send_json(Platform::Twitch, "streams", request).await?;
        Ok(data.data)
    }

    fn normalize(&self, stream: StreamData) -> Option<NormalizedBroadcast> {
        let Some(started_at) = stream.started_at else {
            tracing::debug!(stream_id = %stream.id, "Skipping stream without started_at");
            return None;
        };
        let (status, timestamp) = BroadcastTiming::live_since(started_at).classify()?;

        let login = if stream.user_login.is_empty() {
            stream.user_name.as_str()
        } else {
            stream.user_login.as_str()
        };

        Some(NormalizedBroadcast {
            thumbnail_url: expand_thumbnail_template(
                &stream.thumbnail_url,
                self.config.thumbnail_width,
                self.config.thumbnail_height,
            ),
            watch_url: Self::watch_url(&self.config.watch_base_url, login),
            title: stream.title,
            channel_name: stream.user_name,
            timestamp,
            status,
            video_id: stream.id,
            platform: Platform::Twitch,
        })
    }
}

#[async_trait]
impl BroadcastProvider for TwitchClient {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    async fn fetch_broadcasts(&self, channel_ids: &[String]) -> AppResult<Vec<NormalizedBroadcast>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }
        let (client_id, client_secret) = self.credentials()?;

        let token = self.app_access_token(client_id, client_secret).await?;
        let streams = self.fetch_streams(client_id, &token, channel_ids).await?;

        let broadcasts: Vec<NormalizedBroadcast> = streams
            .into_iter()
            .filter_map(|stream| self.normalize(stream))
            .collect();

        tracing::debug!(
            channels = channel_ids.len(),
            count = broadcasts.len(),
            "Twitch broadcasts normalized"
        );
        Ok(broadcasts)
    }
}
