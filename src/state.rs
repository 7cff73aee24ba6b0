//! Application state for Axum web framework.
//!
//! Contains shared services that are accessible across all request handlers
//! and the one-shot CLI fetch.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::broadcast::ProviderRegistry;
use crate::external::client::build_http_client;
use crate::repositories::{Repositories, StaticChannelDirectory};
use crate::services::Services;

/// Application state containing all shared services.
///
/// Cloning is cheap; the directory and platform clients sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    /// Build the production state from settings.
    ///
    /// One outbound HTTP client is created and shared by all platform
    /// clients; the channel directory is loaded from `[directory]`.
    pub fn new(settings: &Settings) -> AppResult<Self> {
        let http = build_http_client(&settings.http)?;
        let providers = ProviderRegistry::from_config(http, &settings.platforms);
        let directory = StaticChannelDirectory::new(settings.directory.viewers.clone());

        tracing::debug!(
            viewers = directory.viewer_count(),
            "Channel directory loaded"
        );

        let repos = Repositories::new(Arc::new(directory));
        Ok(Self::from_services(Services::new(repos, providers)))
    }

    /// Wrap already-built services.
    pub fn from_services(services: Services) -> Self {
        Self { services }
    }
}
