use crate::adapter::AdapterErrorKind;
use crate::model::query::SearchQuery;
use crate::model::record::{PlatformId, RestaurantRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one platform within an aggregation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlatformStatus {
    Ok { record_count: usize },
    Failed { reason: AdapterErrorKind },
}

/// The merged output of one discovery call. Records are ordered by platform
/// declaration order, then ascending distance from the query center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub query: SearchQuery,
    pub records: Vec<RestaurantRecord>,
    pub per_platform_status: BTreeMap<PlatformId, PlatformStatus>,
    /// True iff every adapter failed and the synthetic seed set was
    /// substituted so the caller still has something to render.
    pub degraded: bool,
}

impl AggregationResult {
    pub fn record(&self, id: &str) -> Option<&RestaurantRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}
