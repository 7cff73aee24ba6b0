use std::sync::Arc;

use super::platform::Platform;
use super::provider::BroadcastProvider;
use super::twitch::TwitchClient;
use super::youtube::YoutubeClient;
use crate::config::settings::PlatformsConfig;

/// Broadcast clients indexed by platform slot.
///
/// Built once at startup and shared read-only across requests and
/// aggregation tasks.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    slots: [Option<Arc<dyn BroadcastProvider>>; Platform::COUNT],
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the production clients from configuration.
    pub fn from_config(http: reqwest::Client, config: &PlatformsConfig) -> Self {
        Self::new()
            .with_provider(Arc::new(YoutubeClient::new(http.clone(), config.youtube.clone())))
            .with_provider(Arc::new(TwitchClient::new(http, config.twitch.clone())))
    }

    /// Register a client in the slot of the platform it reports.
    pub fn with_provider(mut self, provider: Arc<dyn BroadcastProvider>) -> Self {
        let slot = provider.platform().index();
        self.slots[slot] = Some(provider);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<&Arc<dyn BroadcastProvider>> {
        self.slots[platform.index()].as_ref()
    }

    /// Credential presence per registered platform, in dispatch order.
    pub fn credential_status(&self) -> Vec<(Platform, bool)> {
        Platform::ALL
            .iter()
            .filter_map(|p| self.get(*p).map(|provider| (*p, provider.has_credentials())))
            .collect()
    }
}
