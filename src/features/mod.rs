// src/features/mod.rs
pub mod derive;
pub mod metadata;

pub use derive::{city_code, derive_features, FeatureVector, FEATURE_COUNT};
pub use metadata::{get_feature_metadata, FeatureMetadata, FEATURE_NAMES};
