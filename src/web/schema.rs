// src/web/schema.rs
use serde::{Deserialize, Serialize};

use crate::query::RestaurantQuery;
use crate::ranker::LabeledPrediction;
use crate::utils::constants::{
    DEFAULT_COST, DEFAULT_PRICE_RANGE, DEFAULT_RATING, DEFAULT_VOTES,
};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CitiesResponse {
    pub success: bool,
    pub cities: Vec<String>,
}

/// Prediction form. Omitted fields take the form's defaults.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PredictRequest {
    pub city: String,
    pub price_range: Option<i64>,
    pub cost: Option<f64>,
    pub votes: Option<i64>,
    pub rating: Option<f64>,
    pub has_table_booking: Option<bool>,
    pub has_online_delivery: Option<bool>,
    pub threshold_percent: Option<i64>,
}

impl PredictRequest {
    pub fn into_query(self, default_threshold_percent: i64) -> RestaurantQuery {
        RestaurantQuery {
            city: self.city,
            price_range: self.price_range.unwrap_or(DEFAULT_PRICE_RANGE),
            cost: self.cost.unwrap_or(DEFAULT_COST),
            votes: self.votes.unwrap_or(DEFAULT_VOTES),
            rating: self.rating.unwrap_or(DEFAULT_RATING),
            has_table_booking: self.has_table_booking.unwrap_or(true),
            has_online_delivery: self.has_online_delivery.unwrap_or(true),
            threshold_percent: self.threshold_percent.unwrap_or(default_threshold_percent),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub label: String,
    pub confidence: f64,
    /// e.g. "North Indian — 88% confidence"
    pub display: String,
}

impl From<LabeledPrediction> for PredictionView {
    fn from(prediction: LabeledPrediction) -> Self {
        Self {
            display: prediction.to_string(),
            label: prediction.label,
            confidence: prediction.confidence,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictResponse {
    pub success: bool,
    pub threshold_percent: i64,
    pub predictions: Vec<PredictionView>,
    /// Set when no cuisine cleared the threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_defaults() {
        let request: PredictRequest = serde_json::from_str(r#"{"city": "Agra"}"#).unwrap();
        let query = request.into_query(40);

        assert_eq!(query.city, "Agra");
        assert_eq!(query.price_range, 2);
        assert_eq!(query.cost, 500.0);
        assert_eq!(query.votes, 100);
        assert_eq!(query.rating, 3.5);
        assert!(query.has_table_booking);
        assert!(query.has_online_delivery);
        assert_eq!(query.threshold_percent, 40);
    }

    #[test]
    fn test_predict_request_explicit_fields_win() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"city": "Pune", "price_range": 4, "cost": 2500, "votes": 12,
                "rating": 4.9, "has_table_booking": false,
                "has_online_delivery": false, "threshold_percent": 75}"#,
        )
        .unwrap();
        let query = request.into_query(50);

        assert_eq!(query.price_range, 4);
        assert_eq!(query.cost, 2500.0);
        assert_eq!(query.votes, 12);
        assert_eq!(query.rating, 4.9);
        assert!(!query.has_table_booking);
        assert!(!query.has_online_delivery);
        assert_eq!(query.threshold_percent, 75);
    }

    #[test]
    fn test_prediction_view_display() {
        let view = PredictionView::from(LabeledPrediction {
            label: "Chinese".to_string(),
            confidence: 0.614,
        });
        assert_eq!(view.display, "Chinese — 61% confidence");
        assert_eq!(view.label, "Chinese");
    }
}
