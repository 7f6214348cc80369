use async_trait::async_trait;
use savorcore::geo::GeoPoint;
use savorcore::location::{LocationError, LocationProvider};
use serde::Deserialize;
use std::time::Duration;

/// Stands in for a device position fix when the deployment knows where it is
/// (kiosk installs, tests, demos).
pub struct FixedProvider {
    point: GeoPoint,
}

impl FixedProvider {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationProvider for FixedProvider {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.point)
    }
}

/// Approximate position from an ip-api style JSON endpoint. One request per
/// call; the resolver layers its own timeout on top of the client's.
pub struct IpProvider {
    client: reqwest::Client,
    url: String,
}

impl IpProvider {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn parse_lookup(body: &str) -> Result<GeoPoint, LocationError> {
    let response: IpLookupResponse = serde_json::from_str(body)
        .map_err(|err| LocationError::Unavailable(format!("malformed lookup response: {err}")))?;
    if let Some(status) = response.status.as_deref() {
        if status != "success" {
            return Err(LocationError::Unavailable(format!(
                "lookup status {status}"
            )));
        }
    }
    let (lat, lon) = match (response.lat, response.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(LocationError::InvalidCoordinate(
                "lookup response missing lat/lon".to_string(),
            ))
        }
    };
    GeoPoint::new(lat, lon).map_err(|err| LocationError::InvalidCoordinate(err.to_string()))
}

#[async_trait]
impl LocationProvider for IpProvider {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        let response = self.client.get(&self.url).send().await.map_err(|err| {
            if err.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Unavailable(err.to_string())
            }
        })?;
        let body = response
            .text()
            .await
            .map_err(|err| LocationError::Unavailable(err.to_string()))?;
        parse_lookup(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_provider_returns_its_point() {
        let point = GeoPoint::new(1.29, 103.85).unwrap();
        let provider = FixedProvider::new(point);
        assert_eq!(provider.locate().await.unwrap(), point);
    }

    #[test]
    fn parse_accepts_an_ip_api_success_body() {
        let body = r#"{"status":"success","lat":13.75,"lon":100.5,"city":"Bangkok"}"#;
        let point = parse_lookup(body).unwrap();
        assert_eq!(point.latitude, 13.75);
        assert_eq!(point.longitude, 100.5);
    }

    #[test]
    fn parse_rejects_failure_status() {
        let body = r#"{"status":"fail","message":"private range"}"#;
        assert!(matches!(
            parse_lookup(body),
            Err(LocationError::Unavailable(_))
        ));
    }

    #[test]
    fn parse_rejects_out_of_range_coordinates() {
        let body = r#"{"lat":123.0,"lon":500.0}"#;
        assert!(matches!(
            parse_lookup(body),
            Err(LocationError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(matches!(
            parse_lookup(r#"{"status":"success"}"#),
            Err(LocationError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            parse_lookup("not json"),
            Err(LocationError::Unavailable(_))
        ));
    }
}
