// src/web/state.rs
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::auth::{create_session_store, CredentialStore, SharedSessionStore};
use crate::predictor::CuisinePredictor;
use crate::utils::config::AppConfig;

pub struct AppState {
    pub predictor: CuisinePredictor,
    pub credentials: Arc<CredentialStore>,
    pub sessions: SharedSessionStore,
    pub config: AppConfig,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Loads the model and opens the credential store. A model that fails to
    /// load aborts start-up.
    pub fn initialize(config: AppConfig) -> Result<SharedState> {
        let predictor = CuisinePredictor::load(&config.model_path)
            .context("Failed to load cuisine model")?;
        let credentials = CredentialStore::open(&config.user_file)
            .context("Failed to open credential store")?;

        Ok(Self::from_parts(predictor, credentials, config))
    }

    pub fn from_parts(
        predictor: CuisinePredictor,
        credentials: CredentialStore,
        config: AppConfig,
    ) -> SharedState {
        Arc::new(Self {
            predictor,
            credentials: Arc::new(credentials),
            sessions: create_session_store(config.session_ttl_minutes),
            config,
        })
    }
}
