// src/bin/report_model.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;

use tagger_lib::features::get_feature_metadata;
use tagger_lib::model::CuisineModel;
use tagger_lib::utils::config::AppConfig;
use tagger_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about = "Summarize a cuisine model artifact", long_about = None)]
struct ReportArgs {
    /// Model artifact (defaults to TAGGER_MODEL_PATH)
    #[arg(long)]
    model: Option<String>,

    /// Also list every known city
    #[arg(long)]
    cities: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = ReportArgs::parse();

    let model_path = args.model.unwrap_or_else(|| AppConfig::from_env().model_path);
    let model = CuisineModel::load(&model_path)
        .context(format!("Failed to load model from {}", model_path))?;

    println!("Model: {}", model_path);
    println!("Version: {}", model.version().unwrap_or("unversioned"));

    println!("\nFeature schema:");
    for (index, meta) in get_feature_metadata().iter().enumerate() {
        println!("  {:>2}. {:<20} {}", index, meta.name, meta.description);
    }

    let mut kind_counts: BTreeMap<&str, usize> = BTreeMap::new();
    println!("\nLabels ({}):", model.label_count());
    println!("  Label                          | Estimator");
    println!("  -------------------------------|----------");
    for (label, estimator) in model.label_estimators() {
        *kind_counts.entry(estimator.kind()).or_default() += 1;
        println!("  {:<30} | {}", label, estimator.kind());
    }

    println!("\nEstimator kinds:");
    for (kind, count) in &kind_counts {
        println!("  {}: {}", kind, count);
    }

    println!("\nKnown cities: {}", model.cities().len());
    if args.cities {
        for city in model.cities() {
            println!("  {}", city);
        }
    }
    Ok(())
}
