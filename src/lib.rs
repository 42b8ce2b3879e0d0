// src/lib.rs
pub mod auth;
pub mod error;
pub mod features;
pub mod model;
pub mod predictor;
pub mod query;
pub mod ranker;
pub mod utils;
pub mod web;

pub use error::TaggerError;
pub use features::{derive_features, FeatureVector};
pub use model::CuisineModel;
pub use predictor::CuisinePredictor;
pub use query::RestaurantQuery;
pub use ranker::{rank_predictions, LabeledPrediction};
