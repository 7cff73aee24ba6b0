mod platform;
mod provider;
mod registry;
mod twitch;
mod types;
mod youtube;

pub use platform::Platform;
pub use provider::BroadcastProvider;
pub use registry::ProviderRegistry;
pub use twitch::TwitchClient;
pub use types::{
    BroadcastStatus, BroadcastTiming, ChannelReference, NormalizedBroadcast,
    expand_thumbnail_template, resolve_thumbnail,
};
pub use youtube::YoutubeClient;
