// src/bin/predict_cuisines.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde_json::json;

use tagger_lib::features::derive_features;
use tagger_lib::ranker::format_predictions;
use tagger_lib::utils::config::AppConfig;
use tagger_lib::utils::constants::{
    DEFAULT_COST, DEFAULT_PRICE_RANGE, DEFAULT_RATING, DEFAULT_VOTES,
};
use tagger_lib::utils::env::load_env;
use tagger_lib::{CuisinePredictor, RestaurantQuery};

#[derive(Parser)]
#[command(author, version, about = "Predict likely cuisines for a restaurant", long_about = None)]
struct PredictArgs {
    /// Model artifact (defaults to TAGGER_MODEL_PATH)
    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    city: String,

    /// 1 = low, 4 = high
    #[arg(long, default_value_t = DEFAULT_PRICE_RANGE)]
    price_range: i64,

    /// Average cost for two
    #[arg(long, default_value_t = DEFAULT_COST)]
    cost: f64,

    #[arg(long, default_value_t = DEFAULT_VOTES)]
    votes: i64,

    #[arg(long, default_value_t = DEFAULT_RATING)]
    rating: f64,

    #[arg(long)]
    no_table_booking: bool,

    #[arg(long)]
    no_online_delivery: bool,

    /// Confidence threshold in percent (defaults to TAGGER_DEFAULT_THRESHOLD)
    #[arg(long)]
    threshold: Option<i64>,

    /// Print the derived feature vector as well
    #[arg(long)]
    show_features: bool,

    /// Emit JSON instead of formatted lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = PredictArgs::parse();
    let config = AppConfig::from_env();

    let model_path = args.model.unwrap_or(config.model_path);
    let predictor = CuisinePredictor::load(&model_path)
        .context(format!("Failed to load model from {}", model_path))?;

    let query = RestaurantQuery {
        city: args.city,
        price_range: args.price_range,
        cost: args.cost,
        votes: args.votes,
        rating: args.rating,
        has_table_booking: !args.no_table_booking,
        has_online_delivery: !args.no_online_delivery,
        threshold_percent: args.threshold.unwrap_or(config.default_threshold_percent),
    };
    info!("Running prediction for {:?}", query);

    let predictions = predictor.predict(&query).context("Prediction failed")?;
    let features = derive_features(&query);

    if args.json {
        let mut output = json!({
            "threshold_percent": query.threshold_percent,
            "predictions": predictions,
        });
        if args.show_features {
            output["features"] = serde_json::to_value(&features)?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.show_features {
        println!("Features: {:?}", features.to_array());
    }
    for line in format_predictions(&predictions) {
        println!("{}", line);
    }
    Ok(())
}
