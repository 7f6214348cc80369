pub mod places;
pub mod yelp;

pub use places::PlacesAdapter;
pub use yelp::YelpAdapter;

use savorcore::adapter::{AdapterError, AdapterErrorKind};

/// Shared reqwest transport-error mapping for both adapters.
pub(crate) fn map_transport_error(err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::timeout(err.to_string())
    } else if err.is_connect() {
        AdapterError::unreachable(err.to_string())
    } else {
        AdapterError::new(AdapterErrorKind::Unreachable, err.to_string())
    }
}
