use crate::adapters::{PlacesAdapter, YelpAdapter};
use crate::locate::{FixedProvider, IpProvider};
use crate::pipeline::config::PipelineConfig;
use anyhow::Context;
use savorcore::adapter::PlatformAdapter;
use savorcore::geo::GeoPoint;
use savorcore::location::{LocationProvider, LocationResolver};
use savorcore::aggregate::RestaurantAggregator;
use savorcore::session::{DiscoverySession, QueryPlan};
use std::sync::Arc;

/// Wires the configured position source and platform adapters into one
/// discovery session.
#[derive(Clone)]
pub struct Runner {
    config: PipelineConfig,
}

impl Runner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn build_session(&self) -> anyhow::Result<Arc<DiscoverySession>> {
        let provider: Arc<dyn LocationProvider> = match &self.config.fixed_position {
            Some(fixed) => {
                let point = GeoPoint::new(fixed.latitude, fixed.longitude)
                    .context("fixed_position in config is out of range")?;
                Arc::new(FixedProvider::new(point))
            }
            None => Arc::new(
                IpProvider::new(
                    self.config.ip_lookup_url.clone(),
                    self.config.location_timeout_ms,
                )
                .context("building IP position provider")?,
            ),
        };

        let mut adapters: Vec<Arc<dyn PlatformAdapter>> = Vec::new();
        if let Some(endpoint) = &self.config.yelp {
            adapters.push(Arc::new(
                YelpAdapter::new(
                    endpoint.base_url.clone(),
                    endpoint.api_key.clone(),
                    self.config.adapter_timeout_ms,
                )
                .context("building yelp adapter")?,
            ));
        }
        if let Some(endpoint) = &self.config.places {
            adapters.push(Arc::new(
                PlacesAdapter::new(
                    endpoint.base_url.clone(),
                    endpoint.api_key.clone(),
                    self.config.adapter_timeout_ms,
                )
                .context("building places adapter")?,
            ));
        }
        anyhow::ensure!(
            !adapters.is_empty(),
            "no platform adapters configured; set yelp and/or places in the config"
        );

        // Declaration order fixes merge grouping and dedup tie-breaks.
        let platforms: Vec<_> = adapters.iter().map(|adapter| adapter.id()).collect();
        log::info!(
            "discovery session wired with {} platform(s): {:?}",
            platforms.len(),
            platforms
        );
        let discovery_config = self.config.to_discovery_config();
        let resolver = LocationResolver::new(provider);
        let aggregator = RestaurantAggregator::new(adapters, discovery_config.clone());
        let plan = QueryPlan {
            radius_km: self.config.radius_km,
            platforms,
            limit: self.config.limit,
        };
        Ok(Arc::new(DiscoverySession::new(
            resolver,
            aggregator,
            plan,
            discovery_config,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::{FixedPosition, PlatformEndpoint};

    fn config_with_yelp() -> PipelineConfig {
        PipelineConfig {
            yelp: Some(PlatformEndpoint {
                base_url: "https://api.yelp.example".to_string(),
                api_key: "key".to_string(),
            }),
            fixed_position: Some(FixedPosition {
                latitude: 13.7563,
                longitude: 100.5018,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn build_session_requires_at_least_one_adapter() {
        let runner = Runner::new(PipelineConfig::default());
        assert!(runner.build_session().is_err());
    }

    #[test]
    fn build_session_accepts_a_single_platform() {
        let runner = Runner::new(config_with_yelp());
        assert!(runner.build_session().is_ok());
    }

    #[test]
    fn build_session_rejects_out_of_range_fixed_position() {
        let mut config = config_with_yelp();
        config.fixed_position = Some(FixedPosition {
            latitude: 95.0,
            longitude: 0.0,
        });
        assert!(Runner::new(config).build_session().is_err());
    }
}
