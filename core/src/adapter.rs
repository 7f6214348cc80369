use crate::model::{PlatformId, RestaurantRecord, SearchQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failure classes an adapter can report. The aggregator treats every kind
/// the same way (zero records this round); the kind feeds logging and the
/// per-platform status map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterErrorKind {
    Timeout,
    Unauthorized,
    RateLimited,
    MalformedResponse,
    Unreachable,
}

impl std::fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate limited",
            Self::MalformedResponse => "malformed response",
            Self::Unreachable => "unreachable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub detail: String,
}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Timeout, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::MalformedResponse, detail)
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Unreachable, detail)
    }
}

pub type AdapterResult = Result<Vec<RestaurantRecord>, AdapterError>;

/// One upstream platform boundary. Implementations translate their
/// platform's response shape into canonical records, apply the
/// radius-containment filter, and never retry internally.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn id(&self) -> PlatformId;
    async fn fetch(&self, query: &SearchQuery) -> AdapterResult;
}
