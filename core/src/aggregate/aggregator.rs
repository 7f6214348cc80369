use crate::adapter::{AdapterError, PlatformAdapter};
use crate::aggregate::dedup::DedupPolicy;
use crate::aggregate::seed::seed_records;
use crate::geo::haversine_km;
use crate::model::{AggregationResult, PlatformId, PlatformStatus, RestaurantRecord, SearchQuery};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::DiscoveryConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Fans one query out to every configured platform, merges what came back,
/// and guarantees a populated result even when every upstream is down.
pub struct RestaurantAggregator {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    config: DiscoveryConfig,
    dedup: DedupPolicy,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl RestaurantAggregator {
    pub fn new(adapters: Vec<Arc<dyn PlatformAdapter>>, config: DiscoveryConfig) -> Self {
        let dedup = DedupPolicy {
            distance_m: config.dedup_distance_m,
        };
        Self {
            adapters,
            config,
            dedup,
            logger: LogManager::new(),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// One aggregation round. No internal retries; callers re-invoke on user
    /// action.
    pub async fn aggregate(&self, query: &SearchQuery) -> AggregationResult {
        self.metrics.record_aggregation();
        let adapter_timeout = Duration::from_millis(self.config.adapter_timeout_ms);
        // The join ceiling sits above the per-adapter timeout so a
        // well-behaved adapter can never be cut off by the ceiling alone.
        let ceiling = Instant::now()
            + adapter_timeout
            + Duration::from_millis(self.config.aggregate_margin_ms);

        let mut pending = Vec::new();
        for platform in &query.platforms {
            let Some(adapter) = self
                .adapters
                .iter()
                .find(|candidate| candidate.id() == *platform)
                .cloned()
            else {
                pending.push((platform.clone(), None));
                continue;
            };
            let task_query = query.clone();
            let handle = tokio::spawn(async move {
                match tokio::time::timeout(adapter_timeout, adapter.fetch(&task_query)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(AdapterError::timeout("adapter deadline elapsed")),
                }
            });
            pending.push((platform.clone(), Some(handle)));
        }

        let mut statuses: BTreeMap<PlatformId, PlatformStatus> = BTreeMap::new();
        let mut merged: Vec<RestaurantRecord> = Vec::new();
        let mut any_ok = false;

        // Joined in declaration order; output determinism comes from that
        // order plus the per-group distance sort, not from arrival order.
        for (platform, handle) in pending {
            let outcome = match handle {
                None => {
                    self.logger
                        .record_warn(&format!("no adapter configured for platform {platform}"));
                    Err(AdapterError::unreachable("no adapter configured"))
                }
                Some(mut handle) => match tokio::time::timeout_at(ceiling, &mut handle).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(join_err)) => Err(AdapterError::unreachable(format!(
                        "adapter task aborted: {join_err}"
                    ))),
                    Err(_) => {
                        handle.abort();
                        Err(AdapterError::timeout("aggregation ceiling elapsed"))
                    }
                },
            };

            match outcome {
                Ok(records) => {
                    any_ok = true;
                    let mut group = self.enforce_radius(records, query, &platform);
                    group.sort_by(|a, b| {
                        let da = haversine_km(a.position, query.center);
                        let db = haversine_km(b.position, query.center);
                        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    statuses.insert(
                        platform,
                        PlatformStatus::Ok {
                            record_count: group.len(),
                        },
                    );
                    merged.extend(group);
                }
                Err(err) => {
                    self.metrics.record_adapter_failure();
                    self.logger
                        .record_warn(&format!("platform {platform} contributed nothing: {err}"));
                    statuses.insert(platform, PlatformStatus::Failed { reason: err.kind });
                }
            }
        }

        self.dedup.dedup(&mut merged);
        if let Some(limit) = query.limit {
            merged.truncate(limit);
        }

        let degraded = !any_ok;
        if degraded {
            self.metrics.record_degraded_run();
            self.logger.record_warn(
                "every platform failed; substituting the synthetic seed set so the map stays populated",
            );
            merged = seed_records(query);
        }

        self.logger.record(&format!(
            "aggregation complete: {} records from {} platforms (degraded: {})",
            merged.len(),
            query.platforms.len(),
            degraded
        ));

        AggregationResult {
            query: query.clone(),
            records: merged,
            per_platform_status: statuses,
            degraded,
        }
    }

    /// Adapters already filter by radius; a violation here is an adapter bug
    /// and gets logged loudly, never rendered.
    fn enforce_radius(
        &self,
        records: Vec<RestaurantRecord>,
        query: &SearchQuery,
        platform: &PlatformId,
    ) -> Vec<RestaurantRecord> {
        records
            .into_iter()
            .filter(|record| {
                let distance = haversine_km(record.position, query.center);
                if distance > query.radius_km {
                    self.logger.record_alert(&format!(
                        "radius invariant violated by {platform} record {} ({distance:.3}km > {}km); dropping",
                        record.id, query.radius_km
                    ));
                    false
                } else {
                    true
                }
            })
            .collect()
    }
}
