pub mod bridge;
pub mod model;

pub use bridge::DiscoveryBridge;
pub use model::{BridgeModel, MarkerView};
