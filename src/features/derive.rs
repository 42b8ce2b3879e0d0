// src/features/derive.rs
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::query::RestaurantQuery;
use crate::utils::constants::{CITY_CODE_BUCKETS, RATING_OFFSET, VOTES_OFFSET};

pub const FEATURE_COUNT: usize = 9;

/// Model input derived from a [`RestaurantQuery`].
///
/// Field order is the order the classifier was trained on. Reordering or
/// renaming fields requires retraining the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub city_code: u32,
    pub log_cost: f64,
    pub has_table_booking: u8,
    pub has_online_delivery: u8,
    pub price_range: i64,
    pub rating: f64,
    pub log_votes: f64,
    pub votes_per_rating: f64,
    pub cost_per_vote: f64,
}

impl FeatureVector {
    /// Flattens the vector into the numeric row the estimators consume.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.city_code as f64,
            self.log_cost,
            self.has_table_booking as f64,
            self.has_online_delivery as f64,
            self.price_range as f64,
            self.rating,
            self.log_votes,
            self.votes_per_rating,
            self.cost_per_vote,
        ]
    }
}

/// Stable coarse code for a city name.
///
/// The first 8 bytes of SHA-256 over the UTF-8 name, read big-endian, modulo
/// 100. Distinct cities may share a code.
pub fn city_code(city: &str) -> u32 {
    let digest = Sha256::digest(city.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % CITY_CODE_BUCKETS) as u32
}

/// Derives the model's feature vector from raw attributes.
///
/// Assumes the query has been validated; see [`RestaurantQuery::validate`].
pub fn derive_features(query: &RestaurantQuery) -> FeatureVector {
    let votes = query.votes as f64;

    FeatureVector {
        city_code: city_code(&query.city),
        log_cost: query.cost.ln_1p(),
        has_table_booking: u8::from(query.has_table_booking),
        has_online_delivery: u8::from(query.has_online_delivery),
        price_range: query.price_range,
        rating: query.rating,
        log_votes: votes.ln_1p(),
        votes_per_rating: votes / (query.rating + RATING_OFFSET),
        cost_per_vote: query.cost / (votes + VOTES_OFFSET),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(city: &str, cost: f64, votes: i64, rating: f64) -> RestaurantQuery {
        RestaurantQuery {
            city: city.to_string(),
            price_range: 2,
            cost,
            votes,
            rating,
            has_table_booking: true,
            has_online_delivery: false,
            threshold_percent: 50,
        }
    }

    #[test]
    fn test_mumbai_example() {
        let features = derive_features(&query("Mumbai", 500.0, 100, 3.5));

        assert!((features.log_cost - 501f64.ln()).abs() < 1e-12);
        assert!((features.log_cost - 6.217).abs() < 1e-3);
        assert!((features.log_votes - 4.615).abs() < 1e-3);
        assert!((features.votes_per_rating - 27.78).abs() < 1e-2);
        assert!((features.cost_per_vote - 4.95).abs() < 1e-2);
        assert_eq!(features.has_table_booking, 1);
        assert_eq!(features.has_online_delivery, 0);
        assert_eq!(features.price_range, 2);
        assert_eq!(features.rating, 3.5);
        assert_eq!(features.city_code, city_code("Mumbai"));
    }

    #[test]
    fn test_array_follows_schema_order() {
        let features = derive_features(&query("Delhi", 800.0, 40, 4.2));
        let row = features.to_array();

        assert_eq!(row.len(), FEATURE_COUNT);
        assert_eq!(row[0], features.city_code as f64);
        assert_eq!(row[1], features.log_cost);
        assert_eq!(row[2], 1.0);
        assert_eq!(row[3], 0.0);
        assert_eq!(row[4], 2.0);
        assert_eq!(row[5], 4.2);
        assert_eq!(row[6], features.log_votes);
        assert_eq!(row[7], features.votes_per_rating);
        assert_eq!(row[8], features.cost_per_vote);
    }

    #[test]
    fn test_log_features_are_zero_at_zero_and_increasing() {
        let zero = derive_features(&query("Pune", 0.0, 0, 3.0));
        assert_eq!(zero.log_cost, 0.0);
        assert_eq!(zero.log_votes, 0.0);

        let mut previous = zero;
        for step in 1..50 {
            let next = derive_features(&query("Pune", step as f64 * 37.5, step * 11, 3.0));
            assert!(next.log_cost > previous.log_cost);
            assert!(next.log_votes > previous.log_votes);
            previous = next;
        }
    }

    #[test]
    fn test_ratios_stay_finite_at_zero() {
        let features = derive_features(&query("Goa", 300.0, 0, 0.0));
        assert!(features.votes_per_rating.is_finite());
        assert!(features.cost_per_vote.is_finite());
        assert_eq!(features.votes_per_rating, 0.0);
        assert_eq!(features.cost_per_vote, 300.0);

        let features = derive_features(&query("Goa", 300.0, 25, 0.0));
        assert!((features.votes_per_rating - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_city_code_is_stable_and_bounded() {
        for city in ["Mumbai", "New Delhi", "Bangalore", "", "São Paulo", "Ahmedabad"] {
            let code = city_code(city);
            assert!(code < CITY_CODE_BUCKETS as u32);
            assert_eq!(code, city_code(city));
        }
    }
}
