use crate::geo::GeoPoint;
use crate::model::record::PlatformId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidQuery {
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("query names no platforms")]
    NoPlatforms,
}

/// One discovery request. Created per call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    /// Platform declaration order; it drives merge grouping and dedup
    /// tie-breaks, so duplicates are removed while the order is preserved.
    pub platforms: Vec<PlatformId>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(
        center: GeoPoint,
        radius_km: f64,
        platforms: Vec<PlatformId>,
        limit: Option<usize>,
    ) -> Result<Self, InvalidQuery> {
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(InvalidQuery::NonPositiveRadius(radius_km));
        }
        let mut ordered = Vec::with_capacity(platforms.len());
        for platform in platforms {
            if !ordered.contains(&platform) {
                ordered.push(platform);
            }
        }
        if ordered.is_empty() {
            return Err(InvalidQuery::NoPlatforms);
        }
        Ok(Self {
            center,
            radius_km,
            platforms: ordered,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> GeoPoint {
        GeoPoint::new(13.7563, 100.5018).unwrap()
    }

    #[test]
    fn query_rejects_zero_radius() {
        let result = SearchQuery::new(center(), 0.0, vec![PlatformId::from("a")], None);
        assert!(matches!(result, Err(InvalidQuery::NonPositiveRadius(_))));
    }

    #[test]
    fn query_deduplicates_platforms_preserving_order() {
        let query = SearchQuery::new(
            center(),
            5.0,
            vec![
                PlatformId::from("b"),
                PlatformId::from("a"),
                PlatformId::from("b"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(
            query.platforms,
            vec![PlatformId::from("b"), PlatformId::from("a")]
        );
    }

    #[test]
    fn query_requires_a_platform() {
        assert!(matches!(
            SearchQuery::new(center(), 5.0, vec![], None),
            Err(InvalidQuery::NoPlatforms)
        ));
    }
}
