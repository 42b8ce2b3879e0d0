// src/predictor.rs
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::error::TaggerError;
use crate::features::derive_features;
use crate::model::CuisineModel;
use crate::query::RestaurantQuery;
use crate::ranker::{rank_predictions, LabeledPrediction};

/// Validates a query, derives its features and ranks the model's labels.
#[derive(Debug, Clone)]
pub struct CuisinePredictor {
    model: Arc<CuisineModel>,
}

impl CuisinePredictor {
    pub fn new(model: Arc<CuisineModel>) -> Self {
        Self { model }
    }

    /// Loads the model artifact. Failure here is fatal for the caller.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaggerError> {
        Ok(Self::new(Arc::new(CuisineModel::load(path)?)))
    }

    pub fn model(&self) -> &CuisineModel {
        &self.model
    }

    pub fn predict(&self, query: &RestaurantQuery) -> Result<Vec<LabeledPrediction>, TaggerError> {
        query.validate()?;
        let threshold = u8::try_from(query.threshold_percent).map_err(|_| {
            TaggerError::invalid_input(format!(
                "threshold_percent {} is not a percentage",
                query.threshold_percent
            ))
        })?;

        let features = derive_features(query);
        let predictions = rank_predictions(&features, &self.model, threshold);

        info!(
            "Predicted {} cuisines for city '{}' (city code {}) at {}% threshold",
            predictions.len(),
            query.city,
            features.city_code,
            threshold
        );
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::tests::constant_model;

    fn query(threshold_percent: i64) -> RestaurantQuery {
        RestaurantQuery {
            city: "Jaipur".to_string(),
            price_range: 3,
            cost: 1200.0,
            votes: 340,
            rating: 4.1,
            has_table_booking: false,
            has_online_delivery: true,
            threshold_percent,
        }
    }

    #[test]
    fn test_predict_ranks_labels() {
        let predictor = CuisinePredictor::new(Arc::new(constant_model(&[
            ("Rajasthani", 0.81),
            ("Chinese", 0.35),
            ("North Indian", 0.64),
        ])));

        let predictions = predictor.predict(&query(50)).unwrap();
        let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Rajasthani", "North Indian"]);
    }

    #[test]
    fn test_predict_empty_is_ok() {
        let predictor = CuisinePredictor::new(Arc::new(constant_model(&[("Cafe", 0.2)])));
        assert!(predictor.predict(&query(90)).unwrap().is_empty());
    }

    #[test]
    fn test_predict_rejects_invalid_query() {
        let predictor = CuisinePredictor::new(Arc::new(constant_model(&[("Cafe", 0.2)])));
        let mut bad = query(50);
        bad.price_range = 7;
        assert!(matches!(
            predictor.predict(&bad),
            Err(TaggerError::InvalidInput(_))
        ));
    }
}
