// src/utils/constants.rs

/// Number of buckets the city hash is reduced into.
pub const CITY_CODE_BUCKETS: u64 = 100;

/// Added to the rating before dividing votes by it, so a 0.0 rating stays finite.
pub const RATING_OFFSET: f64 = 0.1;

/// Added to the vote count before dividing cost by it.
pub const VOTES_OFFSET: f64 = 1.0;

pub const PRICE_RANGE_MIN: i64 = 1;
pub const PRICE_RANGE_MAX: i64 = 4;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;
pub const THRESHOLD_PERCENT_MAX: i64 = 100;

/// Maximum number of cuisines reported per request.
pub const MAX_REPORTED_LABELS: usize = 5;

// Form defaults used when a request leaves a field out.
pub const DEFAULT_PRICE_RANGE: i64 = 2;
pub const DEFAULT_COST: f64 = 500.0;
pub const DEFAULT_VOTES: i64 = 100;
pub const DEFAULT_RATING: f64 = 3.5;
pub const DEFAULT_THRESHOLD_PERCENT: i64 = 50;

pub const EMPTY_RESULT_MESSAGE: &str = "No cuisines passed the confidence threshold.";
