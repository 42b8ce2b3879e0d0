// src/model/mod.rs
pub mod artifact;
pub mod estimator;

pub use artifact::{CuisineModel, ModelArtifact};
pub use estimator::{BinaryEstimator, DecisionTree, Estimator, ForestEstimator, LogisticEstimator};
