// src/ranker.rs
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::FeatureVector;
use crate::model::CuisineModel;
use crate::utils::constants::{EMPTY_RESULT_MESSAGE, MAX_REPORTED_LABELS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPrediction {
    pub label: String,
    pub confidence: f64,
}

impl fmt::Display for LabeledPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:.0}` rounds half to even, so 12.5% shows as 12%.
        write!(f, "{} — {:.0}% confidence", self.label, self.confidence * 100.0)
    }
}

/// Scores every label, keeps those at or above `threshold_percent`, and
/// returns the best [`MAX_REPORTED_LABELS`] by descending confidence.
///
/// Equal confidences keep the model's label order. An empty result means no
/// label cleared the threshold.
pub fn rank_predictions(
    features: &FeatureVector,
    model: &CuisineModel,
    threshold_percent: u8,
) -> Vec<LabeledPrediction> {
    let cutoff = f64::from(threshold_percent) / 100.0;
    let row = features.to_array();

    let mut retained: Vec<LabeledPrediction> = model
        .label_probabilities(&row)
        .into_iter()
        .filter(|(_, probability)| *probability >= cutoff)
        .map(|(label, probability)| LabeledPrediction {
            label: label.to_string(),
            confidence: probability,
        })
        .collect();

    debug!(
        "{} of {} labels cleared the {}% threshold",
        retained.len(),
        model.label_count(),
        threshold_percent
    );

    // sort_by is stable, so ties stay in label order.
    retained.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    retained.truncate(MAX_REPORTED_LABELS);
    retained
}

/// Human-readable lines for a ranked result, or the informational message
/// when nothing passed the threshold.
pub fn format_predictions(predictions: &[LabeledPrediction]) -> Vec<String> {
    if predictions.is_empty() {
        vec![EMPTY_RESULT_MESSAGE.to_string()]
    } else {
        predictions.iter().map(ToString::to_string).collect()
    }
}
