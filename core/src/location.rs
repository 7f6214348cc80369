use crate::geo::GeoPoint;
use crate::telemetry::LogManager;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Reference point substituted whenever position lookup fails: Bangkok city
/// centre, the platform's launch market.
pub const FALLBACK_REFERENCE_POINT: GeoPoint = GeoPoint {
    latitude: 13.7563,
    longitude: 100.5018,
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("position permission denied")]
    Denied,
    #[error("position lookup timed out")]
    Timeout,
    #[error("invalid coordinate from provider: {0}")]
    InvalidCoordinate(String),
    #[error("position provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of a device position fix (browser geolocation, IP lookup, a fixed
/// test coordinate). One attempt per call; the resolver owns the timeout.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<GeoPoint, LocationError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    /// True when the provider failed and the fixed reference point was
    /// substituted, so the caller can flag results as approximate.
    pub used_fallback: bool,
}

/// Resolves the caller's position with a bounded wait and a deterministic
/// fallback. Never errors and never retries; re-resolution is the caller's
/// decision.
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
    fallback: GeoPoint,
    logger: LogManager,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self::with_fallback(provider, FALLBACK_REFERENCE_POINT)
    }

    pub fn with_fallback(provider: Arc<dyn LocationProvider>, fallback: GeoPoint) -> Self {
        Self {
            provider,
            fallback,
            logger: LogManager::new(),
        }
    }

    pub async fn resolve(&self, timeout_ms: u64) -> ResolvedLocation {
        let attempt =
            tokio::time::timeout(Duration::from_millis(timeout_ms), self.provider.locate()).await;

        match attempt {
            Ok(Ok(point)) => {
                let (normalized, clamped) = GeoPoint::clamped(point.latitude, point.longitude);
                if clamped {
                    // Providers must hand over valid coordinates; clamping
                    // here means an upstream bug, not a tolerated input.
                    self.logger.record_alert(&format!(
                        "provider reported out-of-range coordinate ({}, {}); clamped to ({}, {})",
                        point.latitude,
                        point.longitude,
                        normalized.latitude,
                        normalized.longitude
                    ));
                }
                ResolvedLocation {
                    point: normalized,
                    used_fallback: false,
                }
            }
            Ok(Err(err)) => {
                self.logger
                    .record_warn(&format!("position lookup failed ({err}); using fallback"));
                ResolvedLocation {
                    point: self.fallback,
                    used_fallback: true,
                }
            }
            Err(_) => {
                self.logger.record_warn(&format!(
                    "position lookup exceeded {timeout_ms}ms; using fallback"
                ));
                ResolvedLocation {
                    point: self.fallback,
                    used_fallback: true,
                }
            }
        }
    }
}
