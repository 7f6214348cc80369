pub use crate::adapter::{AdapterError, AdapterErrorKind, AdapterResult, PlatformAdapter};
pub use crate::aggregate::{DedupPolicy, RestaurantAggregator, SEED_VERSION};
pub use crate::geo::{haversine_km, haversine_m, GeoPoint};
pub use crate::location::{
    LocationError, LocationProvider, LocationResolver, ResolvedLocation, FALLBACK_REFERENCE_POINT,
};
pub use crate::model::{
    AggregationResult, PlatformId, PlatformStatus, PriceTier, RestaurantRecord, SearchQuery,
};
pub use crate::session::{DiscoverySession, DiscoverySnapshot, QueryPlan, SessionState};
pub use crate::viewport::{
    ColorClass, MapProjector, MarkerAnnotation, MarkerClassifier, SizeTier, Viewport,
    ViewportProjection,
};
pub use crate::DiscoveryConfig;
