// src/query.rs
use serde::{Deserialize, Serialize};

use crate::error::TaggerError;
use crate::utils::constants::{
    PRICE_RANGE_MAX, PRICE_RANGE_MIN, RATING_MAX, RATING_MIN, THRESHOLD_PERCENT_MAX,
};

/// Raw restaurant attributes for a single prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantQuery {
    pub city: String,
    pub price_range: i64,
    pub cost: f64,
    pub votes: i64,
    pub rating: f64,
    pub has_table_booking: bool,
    pub has_online_delivery: bool,
    pub threshold_percent: i64,
}

impl RestaurantQuery {
    /// Checks every field against the ranges the model was trained on.
    pub fn validate(&self) -> Result<(), TaggerError> {
        if self.city.trim().is_empty() {
            return Err(TaggerError::invalid_input("city must not be empty"));
        }
        if !(PRICE_RANGE_MIN..=PRICE_RANGE_MAX).contains(&self.price_range) {
            return Err(TaggerError::invalid_input(format!(
                "price_range must be between {} and {}, got {}",
                PRICE_RANGE_MIN, PRICE_RANGE_MAX, self.price_range
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(TaggerError::invalid_input(format!(
                "cost must be a non-negative number, got {}",
                self.cost
            )));
        }
        if self.votes < 0 {
            return Err(TaggerError::invalid_input(format!(
                "votes must not be negative, got {}",
                self.votes
            )));
        }
        // NaN fails the range check as well.
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(TaggerError::invalid_input(format!(
                "rating must be between {} and {}, got {}",
                RATING_MIN, RATING_MAX, self.rating
            )));
        }
        if !(0..=THRESHOLD_PERCENT_MAX).contains(&self.threshold_percent) {
            return Err(TaggerError::invalid_input(format!(
                "threshold_percent must be between 0 and {}, got {}",
                THRESHOLD_PERCENT_MAX, self.threshold_percent
            )));
        }
        Ok(())
    }

    /// The threshold as a probability cutoff in [0, 1].
    pub fn probability_cutoff(&self) -> f64 {
        self.threshold_percent as f64 / 100.0
    }
}
