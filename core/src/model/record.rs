use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Identifier of an upstream data platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(pub String);

impl PlatformId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlatformId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    #[default]
    Unknown,
    Budget,
    Moderate,
    Upscale,
    Premium,
}

/// Canonical restaurant record every platform response is normalized into.
/// Immutable after creation and owned by its containing aggregation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub price_tier: PriceTier,
    pub position: GeoPoint,
    pub source_platform: PlatformId,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub raw_attributes: Map<String, serde_json::Value>,
}

impl RestaurantRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cuisine: Option<String>,
        rating: Option<f64>,
        price_tier: PriceTier,
        position: GeoPoint,
        source_platform: PlatformId,
        raw_attributes: Map<String, serde_json::Value>,
    ) -> Self {
        // Ratings live on a 0..5 scale; anything else is treated as absent.
        let rating = rating.filter(|r| r.is_finite() && (0.0..=5.0).contains(r));
        Self {
            id: id.into(),
            name: name.into(),
            cuisine,
            rating,
            price_tier,
            position,
            source_platform,
            raw_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_scale_rating_is_dropped() {
        let record = RestaurantRecord::new(
            "test:1",
            "Test",
            None,
            Some(9.7),
            PriceTier::Unknown,
            GeoPoint::new(0.0, 0.0).unwrap(),
            PlatformId::from("test"),
            Map::new(),
        );
        assert_eq!(record.rating, None);
    }
}
