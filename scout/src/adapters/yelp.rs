use crate::adapters::map_transport_error;
use async_trait::async_trait;
use savorcore::adapter::{AdapterError, AdapterErrorKind, AdapterResult, PlatformAdapter};
use savorcore::geo::{haversine_km, GeoPoint};
use savorcore::model::{PlatformId, PriceTier, RestaurantRecord, SearchQuery};
use savorcore::telemetry::LogManager;
use serde::Deserialize;
use serde_json::{json, Map};
use std::time::Duration;

pub const YELP_PLATFORM: &str = "yelp";

/// Yelp caps the search radius parameter at 40km.
const MAX_RADIUS_M: f64 = 40_000.0;
const PAGE_LIMIT: usize = 50;

/// Yelp Fusion business-search boundary. Translates one search response into
/// canonical records and nothing else; retries and fan-out policy live in
/// the aggregator.
pub struct YelpAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    logger: LogManager,
}

impl YelpAdapter {
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
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    id: String,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    coordinates: Option<Coordinates>,
    #[serde(default)]
    review_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default)]
    alias: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn parse_response(body: &str) -> Result<SearchResponse, AdapterError> {
    serde_json::from_str(body)
        .map_err(|err| AdapterError::malformed(format!("yelp search response: {err}")))
}

fn map_status(status: reqwest::StatusCode) -> Result<(), AdapterError> {
    use reqwest::StatusCode;
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AdapterError::new(
            AdapterErrorKind::Unauthorized,
            format!("yelp returned {status}"),
        )),
        StatusCode::TOO_MANY_REQUESTS => Err(AdapterError::new(
            AdapterErrorKind::RateLimited,
            format!("yelp returned {status}"),
        )),
        status if !status.is_success() => {
            Err(AdapterError::unreachable(format!("yelp returned {status}")))
        }
        _ => Ok(()),
    }
}

fn price_tier(price: Option<&str>) -> PriceTier {
    match price.map(|p| p.chars().filter(|c| *c == '$').count()) {
        Some(1) => PriceTier::Budget,
        Some(2) => PriceTier::Moderate,
        Some(3) => PriceTier::Upscale,
        Some(n) if n >= 4 => PriceTier::Premium,
        _ => PriceTier::Unknown,
    }
}

impl YelpAdapter {
    fn normalize(&self, response: SearchResponse, query: &SearchQuery) -> Vec<RestaurantRecord> {
        let mut records = Vec::with_capacity(response.businesses.len());
        for business in response.businesses {
            let Some(coordinates) = business.coordinates else {
                self.logger.record_warn(&format!(
                    "yelp business {} has no coordinates; skipping",
                    business.id
                ));
                continue;
            };
            let position = match (coordinates.latitude, coordinates.longitude) {
                (Some(lat), Some(lon)) => match GeoPoint::new(lat, lon) {
                    Ok(point) => point,
                    Err(err) => {
                        self.logger.record_warn(&format!(
                            "yelp business {}: {err}; skipping",
                            business.id
                        ));
                        continue;
                    }
                },
                _ => continue,
            };
            if haversine_km(position, query.center) > query.radius_km {
                continue;
            }

            let cuisine = business
                .categories
                .first()
                .map(|category| category.title.clone());
            let mut raw = Map::new();
            raw.insert(
                "category_aliases".to_string(),
                json!(business
                    .categories
                    .iter()
                    .map(|c| c.alias.clone())
                    .collect::<Vec<_>>()),
            );
            if let Some(count) = business.review_count {
                raw.insert("review_count".to_string(), json!(count));
            }

            records.push(RestaurantRecord::new(
                format!("{YELP_PLATFORM}:{}", business.id),
                business.name,
                cuisine,
                business.rating,
                price_tier(business.price.as_deref()),
                position,
                PlatformId::from(YELP_PLATFORM),
                raw,
            ));
        }
        records
    }
}

#[async_trait]
impl PlatformAdapter for YelpAdapter {
    fn id(&self) -> PlatformId {
        PlatformId::from(YELP_PLATFORM)
    }

    async fn fetch(&self, query: &SearchQuery) -> AdapterResult {
        let radius_m = (query.radius_km * 1000.0).min(MAX_RADIUS_M).round() as u64;
        let url = format!("{}/v3/businesses/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("latitude", query.center.latitude.to_string()),
                ("longitude", query.center.longitude.to_string()),
                ("radius", radius_m.to_string()),
                ("categories", "restaurants".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        map_status(response.status())?;
        let body = response
            .text()
            .await
            .map_err(|err| AdapterError::malformed(err.to_string()))?;
        let parsed = parse_response(&body)?;
        Ok(self.normalize(parsed, query))
    }
}
