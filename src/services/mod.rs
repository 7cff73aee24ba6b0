//! Service layer for business logic operations.
//!
//! Services coordinate the channel directory and the platform clients on
//! behalf of the HTTP handlers and the CLI.

mod broadcast_service;
mod channel_service;

pub use broadcast_service::{AggregationReport, BroadcastService, PlatformFailure};
pub use channel_service::ChannelService;

use crate::external::broadcast::ProviderRegistry;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap; directory and clients sit behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub broadcasts: BroadcastService,
    pub channels: ChannelService,
    pub providers: ProviderRegistry,
}

impl Services {
    pub fn new(repos: Repositories, providers: ProviderRegistry) -> Self {
        Self {
            broadcasts: BroadcastService::new(repos.channels.clone(), providers.clone()),
            channels: ChannelService::new(repos.channels),
            providers,
        }
    }
}
