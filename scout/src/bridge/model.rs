use savorcore::geo::GeoPoint;
use savorcore::model::{PlatformId, PlatformStatus};
use savorcore::session::DiscoverySnapshot;
use savorcore::viewport::{ColorClass, MapProjector, SizeTier, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One renderable marker: projection and annotation joined per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerView {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub platform: PlatformId,
    pub x: f64,
    pub y: f64,
    pub on_screen: bool,
    pub color_class: ColorClass,
    pub size_tier: SizeTier,
}

/// Serialized view of the current discovery state for the HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeModel {
    pub center: Option<GeoPoint>,
    pub degraded: bool,
    pub used_fallback: bool,
    pub markers: Vec<MarkerView>,
    #[serde(default)]
    pub per_platform_status: BTreeMap<PlatformId, PlatformStatus>,
}

impl BridgeModel {
    pub fn from_snapshot(snapshot: &DiscoverySnapshot, projector: &MapProjector) -> Self {
        let result = &snapshot.result;
        let viewport = Viewport::fit_radius(result.query.center, result.query.radius_km);
        let projections = projector.project(&result.records, &viewport);

        // Records, annotations, and projections share one index space.
        let markers = result
            .records
            .iter()
            .zip(snapshot.annotations.iter())
            .zip(projections.iter())
            .map(|((record, annotation), projection)| MarkerView {
                id: record.id.clone(),
                name: record.name.clone(),
                cuisine: record.cuisine.clone(),
                rating: record.rating,
                platform: record.source_platform.clone(),
                x: projection.x_normalized,
                y: projection.y_normalized,
                on_screen: projection.on_screen,
                color_class: annotation.color_class,
                size_tier: annotation.size_tier,
            })
            .collect();

        Self {
            center: Some(result.query.center),
            degraded: result.degraded,
            used_fallback: snapshot.used_fallback,
            markers,
            per_platform_status: result.per_platform_status.clone(),
        }
    }
}
