pub mod query;
pub mod record;
pub mod result;

pub use query::{InvalidQuery, SearchQuery};
pub use record::{PlatformId, PriceTier, RestaurantRecord};
pub use result::{AggregationResult, PlatformStatus};
