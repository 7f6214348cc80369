use anyhow::Context;
use savorcore::DiscoveryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformEndpoint {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixedPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Driver-level configuration: query shape, timeouts, position source, and
/// the upstream platform endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub radius_km: f64,
    pub limit: Option<usize>,
    pub adapter_timeout_ms: u64,
    pub aggregate_margin_ms: u64,
    pub location_timeout_ms: u64,
    pub dedup_distance_m: f64,
    pub viewport_margin: f64,
    /// When set, stands in for a device fix; otherwise the IP lookup runs.
    pub fixed_position: Option<FixedPosition>,
    pub ip_lookup_url: String,
    pub yelp: Option<PlatformEndpoint>,
    pub places: Option<PlatformEndpoint>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let discovery = DiscoveryConfig::default();
        Self {
            radius_km: 5.0,
            limit: None,
            adapter_timeout_ms: discovery.adapter_timeout_ms,
            aggregate_margin_ms: discovery.aggregate_margin_ms,
            location_timeout_ms: discovery.location_timeout_ms,
            dedup_distance_m: discovery.dedup_distance_m,
            viewport_margin: discovery.viewport_margin,
            fixed_position: None,
            ip_lookup_url: "http://ip-api.com/json".to_string(),
            yelp: None,
            places: None,
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pipeline config {}", path_ref.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pipeline config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(radius_km: f64, limit: Option<usize>) -> Self {
        Self {
            radius_km,
            limit,
            ..Default::default()
        }
    }

    pub fn to_discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            adapter_timeout_ms: self.adapter_timeout_ms,
            aggregate_margin_ms: self.aggregate_margin_ms,
            location_timeout_ms: self.location_timeout_ms,
            dedup_distance_m: self.dedup_distance_m,
            viewport_margin: self.viewport_margin,
        }
    }
}
