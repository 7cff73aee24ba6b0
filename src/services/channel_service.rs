//! Viewer channel listing.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::{ChannelDirectory, RegisteredChannel};

/// Read access to a viewer's registered channels.
#[derive(Clone)]
pub struct ChannelService {
    directory: Arc<dyn ChannelDirectory>,
}

impl ChannelService {
    pub fn new(directory: Arc<dyn ChannelDirectory>) -> Self {
        Self { directory }
    }

    /// Channels registered for a viewer, in registration order.
    pub async fn list(&self, viewer_id: &str) -> AppResult<Vec<RegisteredChannel>> {
        let channels = self
            .directory
            .channels(viewer_id)
            .await
            .map_err(|source| AppError::Directory {
                viewer_id: viewer_id.to_string(),
                source,
            })?;

        tracing::debug!(viewer_id = %viewer_id, count = channels.len(), "Listed viewer channels");
        Ok(channels)
    }
}
