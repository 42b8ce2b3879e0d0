use anyhow::Result;
use log::info;
use tagger_lib::utils::{config::AppConfig, env::load_env};
use tagger_lib::web::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    info!("Starting cuisine tagger service");
    load_env();

    let config = AppConfig::from_env();
    config.log_config();

    start_server(config).await
}
