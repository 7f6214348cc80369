use crate::geo::{wrap_delta_degrees, wrap_longitude, GeoPoint};
use crate::model::RestaurantRecord;
use serde::{Deserialize, Serialize};

/// Geographic window currently being rendered. The visible span shrinks as
/// zoom grows: `extent_degrees / zoom` degrees across both axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub extent_degrees: f64,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64, extent_degrees: f64) -> Self {
        Self {
            center,
            zoom: if zoom.is_finite() && zoom > 0.0 {
                zoom
            } else {
                1.0
            },
            extent_degrees: if extent_degrees.is_finite() && extent_degrees > 0.0 {
                extent_degrees
            } else {
                1.0
            },
        }
    }

    /// Window that comfortably contains a circle of `radius_km` around the
    /// center at zoom 1.
    pub fn fit_radius(center: GeoPoint, radius_km: f64) -> Self {
        // 1 degree of latitude is ~110.6km; double the radius plus slack.
        let span = (radius_km.max(0.1) * 2.2) / 110.574;
        Self::new(center, 1.0, span)
    }

    fn window_degrees(&self) -> f64 {
        self.extent_degrees / self.zoom
    }
}

/// Normalized render position for one record. (0,0) is the top-left of the
/// frame, x grows east, y grows south.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportProjection {
    pub record_id: String,
    pub x_normalized: f64,
    pub y_normalized: f64,
    pub on_screen: bool,
}

/// Affine projection between geographic coordinates and normalized frame
/// coordinates. Stateless apart from the off-frame margin.
#[derive(Debug, Clone, Copy)]
pub struct MapProjector {
    /// Extra normalized border treated as still-on-screen, so markers just
    /// past the frame edge are not culled mid-pan.
    pub margin: f64,
}

impl Default for MapProjector {
    fn default() -> Self {
        Self { margin: 0.05 }
    }
}

impl MapProjector {
    pub fn new(margin: f64) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    pub fn project(
        &self,
        records: &[RestaurantRecord],
        viewport: &Viewport,
    ) -> Vec<ViewportProjection> {
        records
            .iter()
            .map(|record| {
                let (x, y, on_screen) = self.project_point(record.position, viewport);
                ViewportProjection {
                    record_id: record.id.clone(),
                    x_normalized: x,
                    y_normalized: y,
                    on_screen,
                }
            })
            .collect()
    }

    /// Projects a single point. Longitude deltas are wrapped through ±180°
    /// first; without that, a viewport straddling the antimeridian would
    /// fling records to the far side of the frame.
    pub fn project_point(&self, point: GeoPoint, viewport: &Viewport) -> (f64, f64, bool) {
        let window = viewport.window_degrees();
        let d_lon = wrap_delta_degrees(point.longitude - viewport.center.longitude);
        let d_lat = point.latitude - viewport.center.latitude;

        let x_raw = 0.5 + d_lon / window;
        let y_raw = 0.5 - d_lat / window;

        let on_screen = (-self.margin..=1.0 + self.margin).contains(&x_raw)
            && (-self.margin..=1.0 + self.margin).contains(&y_raw);

        (x_raw.clamp(0.0, 1.0), y_raw.clamp(0.0, 1.0), on_screen)
    }

    /// Inverse transform, exact for points whose projection was not clamped.
    pub fn unproject(&self, x_normalized: f64, y_normalized: f64, viewport: &Viewport) -> GeoPoint {
        let window = viewport.window_degrees();
        let latitude =
            (viewport.center.latitude + (0.5 - y_normalized) * window).clamp(-90.0, 90.0);
        let longitude = wrap_longitude(viewport.center.longitude + (x_normalized - 0.5) * window);
        GeoPoint {
            latitude,
            longitude,
        }
    }
}
