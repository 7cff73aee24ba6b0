use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Streaming platforms with a broadcast client.
///
/// The declaration order is the dispatch order used by the aggregation
/// engine; `index()` addresses the per-platform result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Twitch,
}

impl Platform {
    /// All platforms in dispatch order.
    pub const ALL: [Platform; 2] = [Platform::Youtube, Platform::Twitch];

    /// Number of platform slots.
    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Twitch => "twitch",
        }
    }

    /// Slot index of this platform in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            Platform::Youtube => 0,
            Platform::Twitch => 1,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "twitch" => Ok(Platform::Twitch),
            other => Err(format!(
                "Unknown platform '{}'. Valid platforms are: youtube, twitch",
                other
            )),
        }
    }
}
