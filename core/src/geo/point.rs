use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raised when a coordinate falls outside the WGS84 degree ranges.
#[derive(Debug, Clone, thiserror::Error)]
#[error("coordinate out of range: lat {latitude}, lon {longitude}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let in_range = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if in_range {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Builds a point by clamping out-of-range values. The second element is
    /// true when clamping actually changed either component.
    pub fn clamped(latitude: f64, longitude: f64) -> (Self, bool) {
        let lat = if latitude.is_finite() {
            latitude.clamp(-90.0, 90.0)
        } else {
            0.0
        };
        let lon = if !longitude.is_finite() {
            0.0
        } else if (-180.0..=180.0).contains(&longitude) {
            longitude
        } else {
            wrap_longitude(longitude)
        };
        let changed = lat != latitude || lon != longitude;
        (
            Self {
                latitude: lat,
                longitude: lon,
            },
            changed,
        )
    }
}

/// Normalizes a longitude delta into [-180, 180) so antimeridian-straddling
/// offsets stay continuous.
pub fn wrap_delta_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Normalizes an absolute longitude into [-180, 180).
pub fn wrap_longitude(longitude: f64) -> f64 {
    wrap_delta_degrees(longitude)
}

const KM_PER_DEGREE_LAT: f64 = 110.574;
const KM_PER_DEGREE_LON_EQUATOR: f64 = 111.320;

/// Displaces `origin` by the given east/north distances in kilometres.
/// Small-offset approximation; adequate for the sub-10km ranges this core
/// works with.
pub fn offset_km(origin: GeoPoint, east_km: f64, north_km: f64) -> GeoPoint {
    let lat = (origin.latitude + north_km / KM_PER_DEGREE_LAT).clamp(-90.0, 90.0);
    let lon_scale = KM_PER_DEGREE_LON_EQUATOR * origin.latitude.to_radians().cos().max(1e-6);
    let lon = wrap_longitude(origin.longitude + east_km / lon_scale);
    GeoPoint {
        latitude: lat,
        longitude: lon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range_latitude() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn clamped_reports_adjustment() {
        let (point, changed) = GeoPoint::clamped(95.0, 10.0);
        assert!(changed);
        assert_eq!(point.latitude, 90.0);

        let (_, unchanged) = GeoPoint::clamped(13.75, 100.5);
        assert!(!unchanged);
    }

    #[test]
    fn wrap_delta_crosses_antimeridian() {
        assert!((wrap_delta_degrees(359.0) - (-1.0)).abs() < 1e-9);
        assert!((wrap_delta_degrees(-190.0) - 170.0).abs() < 1e-9);
        assert_eq!(wrap_delta_degrees(-180.0), -180.0);
    }

    #[test]
    fn offset_moves_north_and_east() {
        let origin = GeoPoint::new(13.7563, 100.5018).unwrap();
        let moved = offset_km(origin, 1.0, 1.0);
        assert!(moved.latitude > origin.latitude);
        assert!(moved.longitude > origin.longitude);
    }
}
