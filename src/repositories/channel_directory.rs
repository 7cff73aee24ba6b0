//! Channel directory: which channels a viewer follows.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::external::broadcast::{ChannelReference, Platform};

/// Failure reported by a directory backend.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The viewer has no directory entry at all
    #[error("viewer '{viewer_id}' is not registered")]
    NotFound { viewer_id: String },

    /// The backend could not be reached
    #[error("channel directory unavailable: {message}")]
    Unavailable { message: String },
}

/// A channel registered for a viewer.
///
/// `display_name` and `thumbnail_url` are optional presentation metadata used
/// by the channel listing; aggregation only needs the id and platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredChannel {
    pub channel_id: String,
    pub platform: Platform,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl RegisteredChannel {
    pub fn new(channel_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            channel_id: channel_id.into(),
            platform,
            display_name: None,
            thumbnail_url: None,
        }
    }

    pub fn reference(&self) -> ChannelReference {
        ChannelReference::new(self.channel_id.clone(), self.platform)
    }
}

/// Source of viewer channel registrations.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Full registration records for a viewer.
    async fn channels(&self, viewer_id: &str) -> Result<Vec<RegisteredChannel>, DirectoryError>;

    /// Channel references for a viewer, in registration order.
    ///
    /// A registered viewer with no channels yields an empty list, not an
    /// error.
    async fn resolve(&self, viewer_id: &str) -> Result<Vec<ChannelReference>, DirectoryError> {
        let channels = self.channels(viewer_id).await?;
        Ok(channels.iter().map(RegisteredChannel::reference).collect())
    }
}

/// Directory backed by the `[directory.viewers]` configuration table.
#[derive(Debug, Clone, Default)]
pub struct StaticChannelDirectory {
    viewers: HashMap<String, Vec<RegisteredChannel>>,
}

impl StaticChannelDirectory {
    pub fn new(viewers: HashMap<String, Vec<RegisteredChannel>>) -> Self {
        Self { viewers }
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }
}

#[async_trait]
impl ChannelDirectory for StaticChannelDirectory {
    async fn channels(&self, viewer_id: &str) -> Result<Vec<RegisteredChannel>, DirectoryError> {
        self.viewers
            .get(viewer_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound {
                viewer_id: viewer_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticChannelDirectory {
        let mut viewers = HashMap::new();
        viewers.insert(
            "viewer-1".to_string(),
            vec![
                RegisteredChannel::new("UC_x5XG1OV2P6uZZ5FSM9Ttw", Platform::Youtube),
                RegisteredChannel::new("141981764", Platform::Twitch),
                RegisteredChannel::new("UCBR8-60-B28hp2BmDPdntcQ", Platform::Youtube),
            ],
        );
        viewers.insert("viewer-empty".to_string(), Vec::new());
        StaticChannelDirectory::new(viewers)
    }

    #[tokio::test]
    async fn test_resolve_preserves_registration_order() {
        let refs = directory().resolve("viewer-1").await.unwrap();
        let ids: Vec<&str> = refs.iter().map(|r| r.channel_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["UC_x5XG1OV2P6uZZ5FSM9Ttw", "141981764", "UCBR8-60-B28hp2BmDPdntcQ"]
        );
        assert_eq!(refs[1].platform, Platform::Twitch);
    }

    #[tokio::test]
    async fn test_unknown_viewer_is_not_found() {
        let err = directory().resolve("nobody").await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { ref viewer_id } if viewer_id == "nobody"));
    }

    #[tokio::test]
    async fn test_registered_viewer_without_channels_is_empty() {
        let refs = directory().resolve("viewer-empty").await.unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_registered_channel_deserializes_from_config_shape() {
        let channel: RegisteredChannel = serde_json::from_value(serde_json::json!({
            "channel_id": "141981764",
            "platform": "twitch",
            "display_name": "TwitchDev"
        }))
        .unwrap();
        assert_eq!(channel.platform, Platform::Twitch);
        assert_eq!(channel.display_name.as_deref(), Some("TwitchDev"));
        assert!(channel.thumbnail_url.is_none());
    }
}
