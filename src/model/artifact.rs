// src/model/artifact.rs
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use super::estimator::{BinaryEstimator, Estimator};
use crate::error::TaggerError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};

/// On-disk form of the trained multi-label classifier.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelArtifact {
    #[serde(default)]
    pub version: Option<String>,
    pub feature_names: Vec<String>,
    pub labels: Vec<String>,
    pub estimators: Vec<Estimator>,
    #[serde(default)]
    pub cities: Vec<String>,
}

/// The loaded classifier: one estimator per cuisine label, in label order.
///
/// Built once at start-up and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CuisineModel {
    version: Option<String>,
    labels: Vec<String>,
    estimators: Vec<Estimator>,
    cities: Vec<String>,
}

impl CuisineModel {
    /// Reads and validates a JSON model artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaggerError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        info!("Loading cuisine model from {}", source);

        let raw = fs::read_to_string(path)
            .map_err(|e| TaggerError::model_load(&source, format!("cannot read file: {}", e)))?;
        let model = Self::from_json_str(&raw, &source)?;

        info!(
            "Loaded cuisine model (version {}) with {} labels and {} known cities",
            model.version.as_deref().unwrap_or("unversioned"),
            model.labels.len(),
            model.cities.len()
        );
        Ok(model)
    }

    /// Parses an artifact from a JSON string. `source` names it in errors.
    pub fn from_json_str(raw: &str, source: &str) -> Result<Self, TaggerError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)
            .map_err(|e| TaggerError::model_load(source, format!("invalid artifact JSON: {}", e)))?;
        Self::from_artifact(artifact, source)
    }

    pub fn from_artifact(artifact: ModelArtifact, source: &str) -> Result<Self, TaggerError> {
        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(found, expected)| found != expected)
        {
            return Err(TaggerError::model_load(
                source,
                format!(
                    "feature schema {:?} does not match expected {:?}",
                    artifact.feature_names, FEATURE_NAMES
                ),
            ));
        }

        if artifact.labels.is_empty() {
            return Err(TaggerError::model_load(source, "artifact has no labels"));
        }
        if artifact.labels.len() != artifact.estimators.len() {
            return Err(TaggerError::model_load(
                source,
                format!(
                    "{} labels but {} estimators",
                    artifact.labels.len(),
                    artifact.estimators.len()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for label in &artifact.labels {
            if !seen.insert(label.as_str()) {
                return Err(TaggerError::model_load(
                    source,
                    format!("duplicate label '{}'", label),
                ));
            }
        }

        for (label, estimator) in artifact.labels.iter().zip(&artifact.estimators) {
            estimator.validate(FEATURE_COUNT).map_err(|e| {
                TaggerError::model_load(source, format!("estimator for '{}': {}", label, e))
            })?;
            debug!("Label '{}' uses a {} estimator", label, estimator.kind());
        }

        let cities: Vec<String> = artifact
            .cities
            .into_iter()
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            version: artifact.version,
            labels: artifact.labels,
            estimators: artifact.estimators,
            cities,
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sorted, de-duplicated city pick-list.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels paired with their estimators, in model order.
    pub fn label_estimators(&self) -> impl Iterator<Item = (&str, &Estimator)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.estimators.iter())
    }

    /// Positive-class probability per label, in model order.
    pub fn label_probabilities(&self, features: &[f64]) -> Vec<(&str, f64)> {
        self.label_estimators()
            .map(|(label, estimator)| (label, estimator.positive_probability(features)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn feature_names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// A model whose labels always score the given constant probabilities.
    pub(crate) fn constant_model(scores: &[(&str, f64)]) -> CuisineModel {
        let artifact = ModelArtifact {
            version: Some("test".to_string()),
            feature_names: feature_names(),
            labels: scores.iter().map(|(label, _)| label.to_string()).collect(),
            estimators: scores
                .iter()
                .map(|(_, probability)| Estimator::Constant {
                    probability: *probability,
                })
                .collect(),
            cities: vec![],
        };
        CuisineModel::from_artifact(artifact, "test").unwrap()
    }

    fn base_artifact() -> serde_json::Value {
        json!({
            "version": "2024-06",
            "feature_names": feature_names(),
            "labels": ["North Indian", "Chinese"],
            "estimators": [
                {"type": "logistic", "coefficients": [0.0, 0.5, 0.3, 0.0, 0.2, 0.1, 0.0, 0.0, 0.0], "intercept": -3.0},
                {"type": "constant", "probability": 0.4}
            ],
            "cities": ["Mumbai", "Agra", " Mumbai ", ""]
        })
    }

    fn load_value(value: serde_json::Value) -> Result<CuisineModel, TaggerError> {
        CuisineModel::from_json_str(&value.to_string(), "inline")
    }

    #[test]
    fn test_load_valid_artifact() {
        let model = load_value(base_artifact()).unwrap();
        assert_eq!(model.version(), Some("2024-06"));
        assert_eq!(model.labels(), &["North Indian".to_string(), "Chinese".to_string()]);
        assert_eq!(model.cities(), &["Agra".to_string(), "Mumbai".to_string()]);

        let probabilities = model.label_probabilities(&[0.0; FEATURE_COUNT]);
        assert_eq!(probabilities.len(), 2);
        assert_eq!(probabilities[0].0, "North Indian");
        assert!((probabilities[0].1 - 1.0 / (1.0 + 3f64.exp())).abs() < 1e-12);
        assert_eq!(probabilities[1], ("Chinese", 0.4));
    }

    #[test]
    fn test_cities_are_optional() {
        let mut value = base_artifact();
        value.as_object_mut().unwrap().remove("cities");
        let model = load_value(value).unwrap();
        assert!(model.cities().is_empty());
    }

    #[test]
    fn test_rejects_schema_mismatch() {
        let mut value = base_artifact();
        let mut names = feature_names();
        names.swap(1, 2);
        value["feature_names"] = json!(names);
        assert!(matches!(load_value(value), Err(TaggerError::ModelLoad { .. })));

        let mut value = base_artifact();
        value["feature_names"] = json!(feature_names()[..8].to_vec());
        assert!(load_value(value).is_err());
    }

    #[test]
    fn test_rejects_label_estimator_mismatch() {
        let mut value = base_artifact();
        value["labels"] = json!(["North Indian"]);
        assert!(load_value(value).is_err());

        let mut value = base_artifact();
        value["labels"] = json!([]);
        value["estimators"] = json!([]);
        assert!(load_value(value).is_err());
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let mut value = base_artifact();
        value["labels"] = json!(["Chinese", "Chinese"]);
        assert!(load_value(value).is_err());
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let mut value = base_artifact();
        value["estimators"][0]["coefficients"] = json!([0.1, 0.2]);
        let err = load_value(value).unwrap_err();
        assert!(err.to_string().contains("North Indian"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = CuisineModel::from_json_str("{not json", "inline").unwrap_err();
        assert!(matches!(err, TaggerError::ModelLoad { .. }));
    }

    #[test]
    fn test_missing_file_is_model_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = CuisineModel::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TaggerError::ModelLoad { .. }));
    }

    #[test]
    fn test_bundled_sample_model_is_valid() {
        let model = CuisineModel::from_json_str(
            include_str!("../../data/sample_model.json"),
            "data/sample_model.json",
        )
        .unwrap();
        assert_eq!(model.label_count(), 7);
        assert_eq!(model.cities().first().map(String::as_str), Some("Agra"));
        assert!(model
            .label_probabilities(&[0.0; FEATURE_COUNT])
            .iter()
            .all(|(_, p)| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, base_artifact().to_string()).unwrap();
        let model = CuisineModel::load(&path).unwrap();
        assert_eq!(model.label_count(), 2);
    }
}
