// src/features/metadata.rs
use serde::Serialize;

use super::derive::FEATURE_COUNT;

/// Column names of the trained schema, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "City_Code",
    "log_cost",
    "Has Table booking",
    "Has Online delivery",
    "Price range",
    "Aggregate rating",
    "log_votes",
    "Votes_per_rating",
    "Cost_per_vote",
];

#[derive(Debug, Clone, Serialize)]
pub struct FeatureMetadata {
    pub name: String,
    pub description: String,
    pub min_value: f64,
    pub max_value: f64,
}

pub fn get_feature_metadata() -> Vec<FeatureMetadata> {
    let describe = |index: usize, description: &str, min_value: f64, max_value: f64| {
        FeatureMetadata {
            name: FEATURE_NAMES[index].to_string(),
            description: description.to_string(),
            min_value,
            max_value,
        }
    };

    vec![
        describe(0, "SHA-256 bucket of the city name, modulo 100.", 0.0, 99.0),
        describe(1, "ln(1 + average cost for two).", 0.0, f64::INFINITY),
        describe(2, "1 if the restaurant takes table bookings.", 0.0, 1.0),
        describe(3, "1 if the restaurant delivers online.", 0.0, 1.0),
        describe(4, "Price range bucket, unchanged.", 1.0, 4.0),
        describe(5, "Aggregate rating, unchanged.", 0.0, 5.0),
        describe(6, "ln(1 + number of votes).", 0.0, f64::INFINITY),
        describe(7, "votes / (rating + 0.1).", 0.0, f64::INFINITY),
        describe(8, "cost / (votes + 1).", 0.0, f64::INFINITY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_matches_schema_order() {
        let metadata = get_feature_metadata();
        assert_eq!(metadata.len(), FEATURE_COUNT);
        for (meta, name) in metadata.iter().zip(FEATURE_NAMES.iter()) {
            assert_eq!(meta.name, *name);
            assert!(meta.min_value <= meta.max_value);
        }
    }
}
