//! Broadcast aggregation across platforms.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult, ErrorKind};
use crate::external::broadcast::{
    BroadcastProvider, ChannelReference, NormalizedBroadcast, Platform, ProviderRegistry,
};
use crate::repositories::ChannelDirectory;

type PlatformOutcome = AppResult<Vec<NormalizedBroadcast>>;

/// One slot per platform; `None` means nothing was dispatched for it.
type OutcomeSlots = [Option<PlatformOutcome>; Platform::COUNT];

/// A platform that failed during a partial aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFailure {
    pub platform: Platform,
    pub kind: ErrorKind,
    pub message: String,
}

/// Result of a partial aggregation: whatever succeeded plus what failed.
#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    pub broadcasts: Vec<NormalizedBroadcast>,
    pub failures: Vec<PlatformFailure>,
}

impl AggregationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans a viewer's channels out to the platform clients and merges the results.
///
/// One tokio task is spawned per platform with at least one channel. Tasks
/// are joined without a deadline; outbound HTTP timeouts are the only bound.
#[derive(Clone)]
pub struct BroadcastService {
    directory: Arc<dyn ChannelDirectory>,
    providers: ProviderRegistry,
}

impl BroadcastService {
    pub fn new(directory: Arc<dyn ChannelDirectory>, providers: ProviderRegistry) -> Self {
        Self {
            directory,
            providers,
        }
    }

    /// Aggregate broadcasts for a viewer, failing if any platform fails.
    ///
    /// Records are concatenated in platform dispatch order (YouTube, then
    /// Twitch) and keep each client's own order. When several platforms fail
    /// the first one in dispatch order is reported.
    pub async fn aggregate(&self, viewer_id: &str) -> AppResult<Vec<NormalizedBroadcast>> {
        let started = Instant::now();
        let references = self.resolve(viewer_id).await?;
        if references.is_empty() {
            tracing::debug!(viewer_id = %viewer_id, "Viewer has no channels; skipping dispatch");
            return Ok(Vec::new());
        }

        let slots = self.dispatch(partition(&references)).await;

        let mut broadcasts = Vec::new();
        for outcome in slots.into_iter().flatten() {
            match outcome {
                Ok(records) => broadcasts.extend(records),
                Err(e) => {
                    tracing::warn!(
                        viewer_id = %viewer_id,
                        platform = ?e.platform(),
                        kind = %e.kind(),
                        error = %e,
                        "Aggregation failed"
                    );
                    return Err(e);
                }
            }
        }

        tracing::info!(
            viewer_id = %viewer_id,
            channels = references.len(),
            count = broadcasts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation completed"
        );
        Ok(broadcasts)
    }

    /// Aggregate broadcasts, keeping successful platforms when others fail.
    ///
    /// Directory failures are still fatal.
    pub async fn aggregate_partial(&self, viewer_id: &str) -> AppResult<AggregationReport> {
        let started = Instant::now();
        let references = self.resolve(viewer_id).await?;
        if references.is_empty() {
            return Ok(AggregationReport::default());
        }

        let slots = self.dispatch(partition(&references)).await;

        let mut report = AggregationReport::default();
        for (platform, outcome) in Platform::ALL.into_iter().zip(slots) {
            match outcome {
                Some(Ok(records)) => report.broadcasts.extend(records),
                Some(Err(e)) => {
                    tracing::warn!(
                        viewer_id = %viewer_id,
                        platform = %platform,
                        kind = %e.kind(),
                        error = %e,
                        "Platform failed; continuing with partial results"
                    );
                    report.failures.push(PlatformFailure {
                        platform,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
                None => {}
            }
        }

        tracing::info!(
            viewer_id = %viewer_id,
            count = report.broadcasts.len(),
            failed = report.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Partial aggregation completed"
        );
        Ok(report)
    }

    async fn resolve(&self, viewer_id: &str) -> AppResult<Vec<ChannelReference>> {
        self.directory
            .resolve(viewer_id)
            .await
            .map_err(|source| AppError::Directory {
                viewer_id: viewer_id.to_string(),
                source,
            })
    }

    /// Spawn one task per non-empty platform and join them all.
    ///
    /// Each outcome lands in its platform's slot; nothing is shared between
    /// tasks.
    async fn dispatch(&self, partitions: [Vec<String>; Platform::COUNT]) -> OutcomeSlots {
        let mut slots: OutcomeSlots = std::array::from_fn(|_| None);
        let mut handles: Vec<(Platform, JoinHandle<PlatformOutcome>)> = Vec::new();

        for (platform, channel_ids) in Platform::ALL.into_iter().zip(partitions) {
            if channel_ids.is_empty() {
                continue;
            }

            let Some(provider) = self.providers.get(platform).cloned() else {
                slots[platform.index()] = Some(Err(AppError::PlatformAuth {
                    platform,
                    message: "no client is configured".to_string(),
                }));
                continue;
            };

            tracing::debug!(platform = %platform, channels = channel_ids.len(), "Dispatching platform fetch");
            handles.push((platform, tokio::spawn(fetch(provider, channel_ids))));
        }

        let (platforms, tasks): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        for (platform, joined) in platforms.into_iter().zip(join_all(tasks).await) {
            slots[platform.index()] = Some(joined.unwrap_or_else(|e| {
                Err(AppError::Internal {
                    source: anyhow::anyhow!("{} fetch task failed: {}", platform, e),
                })
            }));
        }

        slots
    }
}

async fn fetch(provider: Arc<dyn BroadcastProvider>, channel_ids: Vec<String>) -> PlatformOutcome {
    let started = Instant::now();
    let result = provider.fetch_broadcasts(&channel_ids).await;
    match &result {
        Ok(records) => tracing::debug!(
            platform = %provider.platform(),
            channels = channel_ids.len(),
            count = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Platform fetch completed"
        ),
        Err(e) => tracing::warn!(
            platform = %provider.platform(),
            kind = %e.kind(),
            error = %e,
            "Platform fetch failed"
        ),
    }
    result
}

/// Group channel ids by platform, keeping directory order within each group.
fn partition(references: &[ChannelReference]) -> [Vec<String>; Platform::COUNT] {
    let mut groups: [Vec<String>; Platform::COUNT] = Default::default();
    for reference in references {
        groups[reference.platform.index()].push(reference.channel_id.clone());
    }
    groups
}
