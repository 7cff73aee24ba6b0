use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Lifecycle state of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastStatus {
    Upcoming,
    Live,
    Ended,
}

impl BroadcastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastStatus::Upcoming => "upcoming",
            BroadcastStatus::Live => "live",
            BroadcastStatus::Ended => "ended",
        }
    }
}

impl std::fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broadcast in the unified schema, independent of its source platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBroadcast {
    pub thumbnail_url: String,
    pub title: String,
    pub channel_name: String,
    /// End time for `ended`, start time for `live`, scheduled time for `upcoming`.
    pub timestamp: Timestamp,
    pub status: BroadcastStatus,
    pub watch_url: String,
    pub video_id: String,
    pub platform: Platform,
}

/// A channel registered for a viewer on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelReference {
    pub channel_id: String,
    pub platform: Platform,
}

impl ChannelReference {
    pub fn new(channel_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            channel_id: channel_id.into(),
            platform,
        }
    }
}

/// Lifecycle timestamps reported for a single item.
///
/// Each field is independently present or absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastTiming {
    pub actual_end: Option<Timestamp>,
    pub actual_start: Option<Timestamp>,
    pub scheduled_start: Option<Timestamp>,
}

impl BroadcastTiming {
    /// Timing for a provider that only reports currently-live streams.
    pub fn live_since(started_at: Timestamp) -> Self {
        Self {
            actual_start: Some(started_at),
            ..Self::default()
        }
    }

    /// Derive the lifecycle status and its timestamp.
    ///
    /// End beats start, start beats schedule. `None` means the item is not a
    /// broadcast and must be dropped.
    pub fn classify(&self) -> Option<(BroadcastStatus, Timestamp)> {
        if let Some(ended) = self.actual_end {
            Some((BroadcastStatus::Ended, ended))
        } else if let Some(started) = self.actual_start {
            Some((BroadcastStatus::Live, started))
        } else {
            self.scheduled_start
                .map(|scheduled| (BroadcastStatus::Upcoming, scheduled))
        }
    }
}

/// Pick the first non-empty thumbnail from candidates ordered best-first.
///
/// Always yields a string; empty when nothing usable is offered.
pub fn resolve_thumbnail<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Substitute `{width}` and `{height}` placeholders in a thumbnail template.
pub fn expand_thumbnail_template(template: &str, width: u32, height: u32) -> String {
    template
        .replace("{width}", &width.to_string())
        .replace("{height}", &height.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_scheduled_only_is_upcoming() {
        let timing = BroadcastTiming {
            scheduled_start: Some(ts("2025-03-01T18:00:00Z")),
            ..Default::default()
        };
        assert_eq!(
            timing.classify(),
            Some((BroadcastStatus::Upcoming, ts("2025-03-01T18:00:00Z")))
        );
    }

    #[test]
    fn test_start_without_end_is_live() {
        let timing = BroadcastTiming {
            actual_start: Some(ts("2025-03-01T18:02:11Z")),
            scheduled_start: Some(ts("2025-03-01T18:00:00Z")),
            ..Default::default()
        };
        assert_eq!(
            timing.classify(),
            Some((BroadcastStatus::Live, ts("2025-03-01T18:02:11Z")))
        );
    }

    #[test]
    fn test_no_timing_is_dropped() {
        assert_eq!(BroadcastTiming::default().classify(), None);
    }

    #[test]
    fn test_live_since() {
        let started = ts("2025-03-01T20:00:00Z");
        assert_eq!(
            BroadcastTiming::live_since(started).classify(),
            Some((BroadcastStatus::Live, started))
        );
    }

    #[test]
    fn test_resolve_thumbnail_prefers_first_non_empty() {
        let url = resolve_thumbnail([None, Some(""), Some("https://i.ytimg.com/hq.jpg"), Some("x")]);
        assert_eq!(url, "https://i.ytimg.com/hq.jpg");
    }

    #[test]
    fn test_resolve_thumbnail_empty_when_absent() {
        assert_eq!(resolve_thumbnail([None, None, Some("  ")]), "");
        assert_eq!(resolve_thumbnail(std::iter::empty()), "");
    }

    #[test]
    fn test_expand_thumbnail_template() {
        let url = expand_thumbnail_template(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_abc-{width}x{height}.jpg",
            480,
            270,
        );
        assert_eq!(
            url,
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_abc-480x270.jpg"
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BroadcastStatus::Upcoming).unwrap(),
            "\"upcoming\""
        );
    }

    fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (0i64..4_102_444_800i64).prop_map(|s| Timestamp::from_second(s).unwrap())
    }

    proptest! {
        #[test]
        fn prop_end_always_wins(
            end in arb_timestamp(),
            start in proptest::option::of(arb_timestamp()),
            scheduled in proptest::option::of(arb_timestamp()),
        ) {
            let timing = BroadcastTiming {
                actual_end: Some(end),
                actual_start: start,
                scheduled_start: scheduled,
            };
            prop_assert_eq!(timing.classify(), Some((BroadcastStatus::Ended, end)));
        }

        #[test]
        fn prop_classified_iff_any_timestamp(
            end in proptest::option::of(arb_timestamp()),
            start in proptest::option::of(arb_timestamp()),
            scheduled in proptest::option::of(arb_timestamp()),
        ) {
            let timing = BroadcastTiming {
                actual_end: end,
                actual_start: start,
                scheduled_start: scheduled,
            };
            let any = end.is_some() || start.is_some() || scheduled.is_some();
            prop_assert_eq!(timing.classify().is_some(), any);
        }

        #[test]
        fn prop_thumbnail_resolution_is_total(
            variants in proptest::collection::vec(
                proptest::option::of("[a-z:/.]{0,12}"),
                0..6,
            )
        ) {
            let expected = variants
                .iter()
                .flatten()
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .unwrap_or("")
                .to_string();
            let resolved = resolve_thumbnail(variants.iter().map(|v| v.as_deref()));
            prop_assert_eq!(resolved, expected);
        }
    }
}
