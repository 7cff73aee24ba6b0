use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::settings::HttpClientConfig;
use crate::error::{AppError, AppResult};
use crate::external::broadcast::Platform;

/// Build the outbound HTTP client shared by all platform clients.
///
/// The client is constructed once from configuration and cloned into each
/// platform client; clones share the same connection pool.
///
/// # Features
/// - **Timeouts**: per-request and connect timeouts from `[http]`. These are
///   the only bound on how long an aggregation can block on a slow platform.
/// - **Compression**: gzip, deflate, brotli, and zstd
/// - **Connection pooling**: idle connections are kept per host
pub fn build_http_client(config: &HttpClientConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| AppError::Configuration {
            key: "http".to_string(),
            source: e.into(),
        })
}

/// Send a request and decode a JSON body.
///
/// Error messages never include the request URL, which may carry query
/// parameters. Transport failures and non-2xx statuses become `AppError::Upstream`
/// (carrying the status when there is one); a body that does not match `T`
/// becomes `AppError::Decode`.
pub async fn send_json<T: DeserializeOwned>(
    platform: Platform,
    operation: &str,
    request: reqwest::RequestBuilder,
) -> AppResult<T> {
    let resp = request.send().await.map_err(|e: reqwest::Error| {
        let e = e.without_url();
        AppError::Upstream {
            platform,
            status: e.status().map(|s| s.as_u16()),
            message: format!("{} request failed: {}", operation, e),
            source: Some(e.into()),
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(
            platform = %platform,
            operation = operation,
            status = status.as_u16(),
            "Upstream returned non-success status"
        );
        return Err(AppError::Upstream {
            platform,
            status: Some(status.as_u16()),
            message: format!("{} returned HTTP {}", operation, status.as_u16()),
            source: None,
        });
    }

    let body = resp.bytes().await.map_err(|e: reqwest::Error| {
        let e = e.without_url();
        AppError::Upstream {
            platform,
            status: Some(status.as_u16()),
            message: format!("{} body read failed: {}", operation, e),
            source: Some(e.into()),
        }
    })?;

    serde_json::from_slice(&body).map_err(|e| AppError::Decode {
        platform,
        message: format!("{} invalid JSON: {}", operation, e),
        source: Some(e.into()),
    })
}
