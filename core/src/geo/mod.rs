pub mod distance;
pub mod point;

pub use distance::{haversine_km, haversine_m};
pub use point::{offset_km, wrap_delta_degrees, wrap_longitude, GeoPoint, InvalidCoordinate};
