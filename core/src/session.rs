use crate::aggregate::RestaurantAggregator;
use crate::location::{LocationResolver, ResolvedLocation};
use crate::model::{AggregationResult, PlatformId, RestaurantRecord, SearchQuery};
use crate::telemetry::LogManager;
use crate::viewport::{MarkerAnnotation, MarkerClassifier};
use crate::DiscoveryConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Resolving,
    Aggregating,
    Ready,
    /// Terminal state for internal invariant violations (a query the session
    /// itself built failing validation). Adapter and location failures never
    /// land here; they degrade gracefully inside the pipeline.
    Failed,
}

/// What the discovery plan keeps fixed across runs; the center is resolved
/// fresh on every start/refresh.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub radius_km: f64,
    pub platforms: Vec<PlatformId>,
    pub limit: Option<usize>,
}

/// Immutable output of one completed discovery run. Shared by reference;
/// replaced wholesale, never mutated in place.
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
    pub result: AggregationResult,
    pub annotations: Vec<MarkerAnnotation>,
    pub used_fallback: bool,
}

struct Inner {
    state: SessionState,
    generation: u64,
    snapshot: Option<Arc<DiscoverySnapshot>>,
}

/// Owns the query lifecycle: resolve position, aggregate, annotate, commit.
/// A newer refresh supersedes any in-flight run; only the latest generation
/// may commit its snapshot, so readers never observe interleaved results.
pub struct DiscoverySession {
    resolver: LocationResolver,
    aggregator: RestaurantAggregator,
    plan: QueryPlan,
    config: DiscoveryConfig,
    inner: RwLock<Inner>,
    logger: LogManager,
}

impl DiscoverySession {
    pub fn new(
        resolver: LocationResolver,
        aggregator: RestaurantAggregator,
        plan: QueryPlan,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            plan,
            config,
            inner: RwLock::new(Inner {
                state: SessionState::Idle,
                generation: 0,
                snapshot: None,
            }),
            logger: LogManager::new(),
        }
    }

    /// First run of the pipeline. Identical to refresh; the distinction is
    /// the caller's (Idle vs Ready starting state).
    pub async fn start(&self) -> Option<Arc<DiscoverySnapshot>> {
        self.run().await
    }

    /// Re-runs the pipeline with a freshly resolved location. Returns the
    /// committed snapshot, or None when a newer refresh superseded this one.
    pub async fn refresh(&self) -> Option<Arc<DiscoverySnapshot>> {
        self.run().await
    }

    async fn run(&self) -> Option<Arc<DiscoverySnapshot>> {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.state = SessionState::Resolving;
            inner.generation
        };

        let resolved: ResolvedLocation =
            self.resolver.resolve(self.config.location_timeout_ms).await;

        {
            let mut inner = self.inner.write().await;
            if inner.generation != generation {
                return None;
            }
            inner.state = SessionState::Aggregating;
        }

        let query = match SearchQuery::new(
            resolved.point,
            self.plan.radius_km,
            self.plan.platforms.clone(),
            self.plan.limit,
        ) {
            Ok(query) => query,
            Err(err) => {
                self.logger
                    .record_alert(&format!("session built an invalid query: {err}"));
                let mut inner = self.inner.write().await;
                if inner.generation == generation {
                    inner.state = SessionState::Failed;
                }
                return None;
            }
        };

        let result = self.aggregator.aggregate(&query).await;
        let annotations = MarkerClassifier::classify_all(&result.records);
        let snapshot = Arc::new(DiscoverySnapshot {
            result,
            annotations,
            used_fallback: resolved.used_fallback,
        });

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            self.logger
                .record("discarding superseded aggregation result");
            return None;
        }
        inner.snapshot = Some(snapshot.clone());
        inner.state = SessionState::Ready;
        Some(snapshot)
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    pub async fn snapshot(&self) -> Option<Arc<DiscoverySnapshot>> {
        self.inner.read().await.snapshot.clone()
    }

    /// Pure lookup into the current result; no side effects.
    pub async fn select_marker(&self, record_id: &str) -> Option<RestaurantRecord> {
        self.inner
            .read()
            .await
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.result.record(record_id).cloned())
    }

    /// Drops the current result and returns to Idle.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.snapshot = None;
        inner.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AdapterError, PlatformAdapter};
    use crate::geo::{offset_km, GeoPoint};
    use crate::location::{LocationError, LocationProvider};
    use crate::model::PriceTier;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn center() -> GeoPoint {
        GeoPoint::new(13.7563, 100.5018).unwrap()
    }

    struct HereProvider;

    #[async_trait]
    impl LocationProvider for HereProvider {
        async fn locate(&self) -> Result<GeoPoint, LocationError> {
            Ok(center())
        }
    }

    fn record(platform: &str, n: usize, name: &str) -> RestaurantRecord {
        RestaurantRecord::new(
            format!("{platform}:{n}"),
            name,
            Some("thai".into()),
            Some(4.8),
            PriceTier::Moderate,
            offset_km(center(), 0.1 * n as f64, 0.0),
            PlatformId::from(platform),
            Map::new(),
        )
    }

    /// Each call takes one scripted (delay, records) step; later calls reuse
    /// the last step.
    struct SequencedAdapter {
        platform: &'static str,
        steps: Vec<(u64, Vec<RestaurantRecord>)>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformAdapter for SequencedAdapter {
        fn id(&self) -> PlatformId {
            PlatformId::from(self.platform)
        }

        async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<RestaurantRecord>, AdapterError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay_ms, records) = &self.steps[call.min(self.steps.len() - 1)];
            tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            Ok(records.clone())
        }
    }

    fn session(adapter: Arc<dyn PlatformAdapter>) -> Arc<DiscoverySession> {
        let config = DiscoveryConfig::default();
        let resolver = LocationResolver::new(Arc::new(HereProvider));
        let aggregator = RestaurantAggregator::new(vec![adapter], config.clone());
        let plan = QueryPlan {
            radius_km: 5.0,
            platforms: vec![PlatformId::from("a")],
            limit: None,
        };
        Arc::new(DiscoverySession::new(resolver, aggregator, plan, config))
    }

    #[tokio::test(start_paused = true)]
    async fn start_reaches_ready_with_a_populated_snapshot() {
        let session = session(Arc::new(SequencedAdapter {
            platform: "a",
            steps: vec![(5, vec![record("a", 1, "Baan Thai")])],
            calls: AtomicUsize::new(0),
        }));

        assert_eq!(session.state().await, SessionState::Idle);
        let snapshot = session.start().await.expect("first run must commit");
        assert_eq!(session.state().await, SessionState::Ready);
        assert_eq!(snapshot.result.records.len(), 1);
        assert_eq!(snapshot.annotations.len(), 1);
        assert!(!snapshot.used_fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_refresh_supersedes_the_in_flight_run() {
        let slow_then_fast = Arc::new(SequencedAdapter {
            platform: "a",
            steps: vec![
                (500, vec![record("a", 1, "Stale House")]),
                (10, vec![record("a", 2, "Fresh Kitchen")]),
            ],
            calls: AtomicUsize::new(0),
        });
        let session = session(slow_then_fast);

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.refresh().await })
        };
        // Let the first run get in flight before superseding it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = session.refresh().await.expect("latest run must commit");

        assert_eq!(second.result.records[0].id, "a:2");
        assert!(first.await.unwrap().is_none(), "stale run must not commit");
        let committed = session.snapshot().await.unwrap();
        assert_eq!(committed.result.records[0].id, "a:2");
        assert_eq!(session.state().await, SessionState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn select_marker_is_a_pure_lookup() {
        let session = session(Arc::new(SequencedAdapter {
            platform: "a",
            steps: vec![(5, vec![record("a", 1, "Baan Thai")])],
            calls: AtomicUsize::new(0),
        }));
        session.start().await.unwrap();

        let hit = session.select_marker("a:1").await;
        assert_eq!(hit.map(|r| r.name), Some("Baan Thai".to_string()));
        assert!(session.select_marker("a:404").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_returns_to_idle() {
        let session = session(Arc::new(SequencedAdapter {
            platform: "a",
            steps: vec![(5, vec![record("a", 1, "Baan Thai")])],
            calls: AtomicUsize::new(0),
        }));
        session.start().await.unwrap();
        session.clear().await;
        assert_eq!(session.state().await, SessionState::Idle);
        assert!(session.snapshot().await.is_none());
    }
}
