use crate::model::RestaurantRecord;
use serde::{Deserialize, Serialize};

/// Marker colour bucket keyed by cuisine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Crimson,
    Amber,
    Emerald,
    Azure,
    Violet,
    Slate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Normal,
    Highlighted,
}

/// Visual classification for one record, independent of its position.
/// Recomputed whenever the record set changes; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerAnnotation {
    pub record_id: String,
    pub color_class: ColorClass,
    pub size_tier: SizeTier,
}

/// Ratings strictly above this render as highlighted markers.
const HIGHLIGHT_RATING: f64 = 4.5;

const ASIAN: &[&str] = &[
    "thai", "chinese", "japanese", "korean", "vietnamese", "sushi", "ramen", "asian", "indian",
];
const EUROPEAN: &[&str] = &[
    "italian", "french", "spanish", "greek", "mediterranean", "pizza", "european",
];
const AMERICAN: &[&str] = &["american", "burger", "bbq", "steak", "diner", "barbecue"];
const GREEN: &[&str] = &["vegetarian", "vegan", "salad", "healthy"];
const SWEET: &[&str] = &["cafe", "coffee", "bakery", "dessert", "ice cream"];

/// Pure, total mapping from record attributes to marker visuals. Safe to run
/// over a record sequence in any order or in parallel.
pub struct MarkerClassifier;

impl MarkerClassifier {
    pub fn classify(record: &RestaurantRecord) -> MarkerAnnotation {
        let color_class = record
            .cuisine
            .as_deref()
            .map(color_for_cuisine)
            .unwrap_or(ColorClass::Slate);
        let size_tier = match record.rating {
            Some(rating) if rating > HIGHLIGHT_RATING => SizeTier::Highlighted,
            _ => SizeTier::Normal,
        };
        MarkerAnnotation {
            record_id: record.id.clone(),
            color_class,
            size_tier,
        }
    }

    pub fn classify_all(records: &[RestaurantRecord]) -> Vec<MarkerAnnotation> {
        records.iter().map(Self::classify).collect()
    }
}

fn color_for_cuisine(cuisine: &str) -> ColorClass {
    let needle = cuisine.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| needle.contains(keyword));
    if matches(ASIAN) {
        ColorClass::Crimson
    } else if matches(EUROPEAN) {
        ColorClass::Amber
    } else if matches(GREEN) {
        ColorClass::Emerald
    } else if matches(AMERICAN) {
        ColorClass::Azure
    } else if matches(SWEET) {
        ColorClass::Violet
    } else {
        ColorClass::Slate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::model::{PlatformId, PriceTier};
    use serde_json::Map;

    fn record(cuisine: Option<&str>, rating: Option<f64>) -> RestaurantRecord {
        RestaurantRecord::new(
            "test:1",
            "Test Spot",
            cuisine.map(str::to_string),
            rating,
            PriceTier::Unknown,
            GeoPoint::new(13.7563, 100.5018).unwrap(),
            PlatformId::from("test"),
            Map::new(),
        )
    }

    #[test]
    fn cuisine_buckets_map_to_colors() {
        let thai = MarkerClassifier::classify(&record(Some("Thai Street Food"), None));
        assert_eq!(thai.color_class, ColorClass::Crimson);

        let italian = MarkerClassifier::classify(&record(Some("italian"), None));
        assert_eq!(italian.color_class, ColorClass::Amber);

        let vegan = MarkerClassifier::classify(&record(Some("Vegan Bowls"), None));
        assert_eq!(vegan.color_class, ColorClass::Emerald);
    }

    #[test]
    fn missing_cuisine_uses_the_default_bucket() {
        let annotation = MarkerClassifier::classify(&record(None, Some(4.0)));
        assert_eq!(annotation.color_class, ColorClass::Slate);
    }

    #[test]
    fn highlight_requires_rating_strictly_above_threshold() {
        assert_eq!(
            MarkerClassifier::classify(&record(None, Some(4.5))).size_tier,
            SizeTier::Normal
        );
        assert_eq!(
            MarkerClassifier::classify(&record(None, Some(4.6))).size_tier,
            SizeTier::Highlighted
        );
        assert_eq!(
            MarkerClassifier::classify(&record(None, None)).size_tier,
            SizeTier::Normal
        );
    }
}
