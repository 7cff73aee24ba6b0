use super::platform::Platform;
use super::types::NormalizedBroadcast;
use crate::error::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait BroadcastProvider: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether the client holds the credentials it needs.
    fn has_credentials(&self) -> bool;

    /// Fetch and normalize broadcasts for the given channels.
    ///
    /// An empty `channel_ids` returns an empty list without touching the
    /// network. Output order follows the provider's details query.
    async fn fetch_broadcasts(&self, channel_ids: &[String]) -> AppResult<Vec<NormalizedBroadcast>>;
}
