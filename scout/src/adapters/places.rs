use crate::adapters::map_transport_error;
use async_trait::async_trait;
use savorcore::adapter::{AdapterError, AdapterErrorKind, AdapterResult, PlatformAdapter};
use savorcore::geo::{haversine_km, GeoPoint};
use savorcore::model::{PlatformId, PriceTier, RestaurantRecord, SearchQuery};
use savorcore::telemetry::LogManager;
use serde::Deserialize;
use serde_json::{json, Map};
use std::time::Duration;

pub const PLACES_PLATFORM: &str = "places";

/// Type tags Google attaches to everything; useless as a cuisine label.
const GENERIC_TYPES: &[&str] = &["restaurant", "food", "point_of_interest", "establishment"];

/// Google Places nearby-search boundary.
pub struct PlacesAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    logger: LogManager,
}

impl PlacesAdapter {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            logger: LogManager::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    user_ratings_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn parse_response(body: &str) -> Result<SearchResponse, AdapterError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|err| AdapterError::malformed(format!("places search response: {err}")))?;
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(response),
        "OVER_QUERY_LIMIT" => Err(AdapterError::new(
            AdapterErrorKind::RateLimited,
            "places quota exhausted",
        )),
        "REQUEST_DENIED" => Err(AdapterError::new(
            AdapterErrorKind::Unauthorized,
            "places request denied",
        )),
        other => Err(AdapterError::malformed(format!(
            "unexpected places status {other}"
        ))),
    }
}

fn price_tier(level: Option<u8>) -> PriceTier {
    match level {
        Some(0) | Some(1) => PriceTier::Budget,
        Some(2) => PriceTier::Moderate,
        Some(3) => PriceTier::Upscale,
        Some(n) if n >= 4 => PriceTier::Premium,
        _ => PriceTier::Unknown,
    }
}

fn cuisine_from_types(types: &[String]) -> Option<String> {
    types
        .iter()
        .find(|t| !GENERIC_TYPES.contains(&t.as_str()))
        .map(|t| t.replace('_', " "))
}

impl PlacesAdapter {
    fn normalize(&self, response: SearchResponse, query: &SearchQuery) -> Vec<RestaurantRecord> {
        let mut records = Vec::with_capacity(response.results.len());
        for place in response.results {
            let Some(geometry) = place.geometry else {
                self.logger.record_warn(&format!(
                    "place {} has no geometry; skipping",
                    place.place_id
                ));
                continue;
            };
            let position = match GeoPoint::new(geometry.location.lat, geometry.location.lng) {
                Ok(point) => point,
                Err(err) => {
                    self.logger
                        .record_warn(&format!("place {}: {err}; skipping", place.place_id));
                    continue;
                }
            };
            if haversine_km(position, query.center) > query.radius_km {
                continue;
            }

            let mut raw = Map::new();
            raw.insert("types".to_string(), json!(place.types));
            if let Some(total) = place.user_ratings_total {
                raw.insert("user_ratings_total".to_string(), json!(total));
            }

            records.push(RestaurantRecord::new(
                format!("{PLACES_PLATFORM}:{}", place.place_id),
                place.name,
                cuisine_from_types(&place.types),
                place.rating,
                price_tier(place.price_level),
                position,
                PlatformId::from(PLACES_PLATFORM),
                raw,
            ));
        }
        records
    }
}

#[async_trait]
impl PlatformAdapter for PlacesAdapter {
    fn id(&self) -> PlatformId {
        PlatformId::from(PLACES_PLATFORM)
    }

    async fn fetch(&self, query: &SearchQuery) -> AdapterResult {
        let url = format!("{}/maps/api/place/nearbysearch/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                (
                    "location",
                    format!(
                        "{},{}",
                        query.center.latitude, query.center.longitude
                    ),
                ),
                ("radius", ((query.radius_km * 1000.0).round()).to_string()),
                ("type", "restaurant".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::new(
                AdapterErrorKind::RateLimited,
                format!("places returned {status}"),
            ));
        }
        if !status.is_success() {
            return Err(AdapterError::unreachable(format!(
                "places returned {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|err| AdapterError::malformed(err.to_string()))?;
        let parsed = parse_response(&body)?;
        Ok(self.normalize(parsed, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PlacesAdapter {
        PlacesAdapter::new("https://maps.example", "key", 1_000).unwrap()
    }

    fn query() -> SearchQuery {
        SearchQuery::new(
            GeoPoint::new(13.7563, 100.5018).unwrap(),
            5.0,
            vec![PlatformId::from(PLACES_PLATFORM)],
            None,
        )
        .unwrap()
    }

    #[test]
    fn normalize_maps_a_full_place() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "place_id": "pid9",
                "name": "Som Tam Paradise",
                "rating": 4.8,
                "price_level": 1,
                "user_ratings_total": 934,
                "types": ["thai_restaurant", "restaurant", "food"],
                "geometry": {"location": {"lat": 13.7580, "lng": 100.5001}}
            }]
        }"#;
        let records = adapter().normalize(parse_response(body).unwrap(), &query());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "places:pid9");
        assert_eq!(record.cuisine.as_deref(), Some("thai restaurant"));
        assert_eq!(record.price_tier, PriceTier::Budget);
    }

    #[test]
    fn generic_types_yield_no_cuisine() {
        let types = vec!["restaurant".to_string(), "food".to_string()];
        assert_eq!(cuisine_from_types(&types), None);
    }

    #[test]
    fn quota_status_maps_to_rate_limited() {
        let body = r#"{"status": "OVER_QUERY_LIMIT", "results": []}"#;
        assert_eq!(
            parse_response(body).unwrap_err().kind,
            AdapterErrorKind::RateLimited
        );
    }

    #[test]
    fn denied_status_maps_to_unauthorized() {
        let body = r#"{"status": "REQUEST_DENIED", "results": []}"#;
        assert_eq!(
            parse_response(body).unwrap_err().kind,
            AdapterErrorKind::Unauthorized
        );
    }

    #[test]
    fn zero_results_is_a_successful_empty_round() {
        let body = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let records = adapter().normalize(parse_response(body).unwrap(), &query());
        assert!(records.is_empty());
    }
}
