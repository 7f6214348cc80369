pub mod aggregator;
pub mod dedup;
pub mod seed;

pub use aggregator::RestaurantAggregator;
pub use dedup::DedupPolicy;
pub use seed::{seed_records, SEED_VERSION};
