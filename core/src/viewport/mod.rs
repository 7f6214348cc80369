pub mod marker;
pub mod projector;

pub use marker::{ColorClass, MarkerAnnotation, MarkerClassifier, SizeTier};
pub use projector::{MapProjector, Viewport, ViewportProjection};
