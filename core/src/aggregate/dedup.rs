use crate::geo::haversine_m;
use crate::model::RestaurantRecord;

/// Cross-platform duplicate detection. Two records are the same restaurant
/// when their normalized names match and their positions sit within
/// `distance_m` of each other. The thresholds are configurable because the
/// upstream platforms disagree about both spelling and pin placement.
#[derive(Debug, Clone, Copy)]
pub struct DedupPolicy {
    pub distance_m: f64,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self { distance_m: 50.0 }
    }
}

impl DedupPolicy {
    pub fn is_duplicate(&self, a: &RestaurantRecord, b: &RestaurantRecord) -> bool {
        normalized_name(&a.name) == normalized_name(&b.name)
            && haversine_m(a.position, b.position) <= self.distance_m
    }

    /// Removes duplicates in place, keeping the first occurrence. Input must
    /// already be in merge order (platform declaration order first), which
    /// makes "first occurrence" the earlier-declared platform's record.
    pub fn dedup(&self, records: &mut Vec<RestaurantRecord>) {
        let mut kept: Vec<RestaurantRecord> = Vec::with_capacity(records.len());
        for record in records.drain(..) {
            if !kept.iter().any(|seen| self.is_duplicate(seen, &record)) {
                kept.push(record);
            }
        }
        *records = kept;
    }
}

/// Case-insensitive, whitespace-collapsed name key.
fn normalized_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{offset_km, GeoPoint};
    use crate::model::{PlatformId, PriceTier};
    use serde_json::Map;

    fn record(id: &str, name: &str, position: GeoPoint, platform: &str) -> RestaurantRecord {
        RestaurantRecord::new(
            id,
            name,
            None,
            None,
            PriceTier::Unknown,
            position,
            PlatformId::from(platform),
            Map::new(),
        )
    }

    #[test]
    fn name_normalization_collapses_case_and_whitespace() {
        assert_eq!(normalized_name("Thai   Kitchen "), "thai kitchen");
        assert_eq!(normalized_name("THAI\tKITCHEN"), "thai kitchen");
    }

    #[test]
    fn nearby_same_name_records_collapse_to_earlier_platform() {
        let center = GeoPoint::new(13.7563, 100.5018).unwrap();
        let mut records = vec![
            record("a:1", "Thai Kitchen", center, "a"),
            record("b:9", "thai   kitchen", offset_km(center, 0.0, 0.04), "b"),
        ];
        DedupPolicy::default().dedup(&mut records);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a:1");
    }

    #[test]
    fn same_name_far_apart_is_two_restaurants() {
        let center = GeoPoint::new(13.7563, 100.5018).unwrap();
        let mut records = vec![
            record("a:1", "Noodle House", center, "a"),
            record("b:2", "Noodle House", offset_km(center, 0.0, 1.2), "b"),
        ];
        DedupPolicy::default().dedup(&mut records);
        assert_eq!(records.len(), 2);
    }
}
