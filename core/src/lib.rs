//! Location discovery and aggregation core for the Savor platform.
//!
//! The modules cover the full pipeline: resolving the caller's position,
//! fanning a query out to the upstream restaurant platforms, merging the
//! responses into one canonical record set, and projecting the result onto a
//! normalized viewport for whatever renderer sits on top.

pub mod adapter;
pub mod aggregate;
pub mod geo;
pub mod location;
pub mod model;
pub mod prelude;
pub mod session;
pub mod telemetry;
pub mod viewport;

use serde::{Deserialize, Serialize};

/// Shared tuning knobs for one discovery pipeline. Every network boundary
/// gets a bounded timeout; an unbounded wait is a defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Per-adapter fetch deadline.
    pub adapter_timeout_ms: u64,
    /// Extra slack on top of the adapter timeout before the aggregator
    /// abandons a join.
    pub aggregate_margin_ms: u64,
    /// Position lookup deadline before the fallback point is substituted.
    pub location_timeout_ms: u64,
    /// Cross-platform duplicate distance tolerance.
    pub dedup_distance_m: f64,
    /// Normalized border still considered on-screen by the projector.
    pub viewport_margin: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            adapter_timeout_ms: 3_000,
            aggregate_margin_ms: 250,
            location_timeout_ms: 2_000,
            dedup_distance_m: 50.0,
            viewport_margin: 0.05,
        }
    }
}
