// src/utils/config.rs
use log::info;
use std::env;
use std::str::FromStr;

use super::constants::{DEFAULT_THRESHOLD_PERCENT, THRESHOLD_PERCENT_MAX};

/// Runtime settings for the tagger service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub host: String,
    pub port: u16,
    /// JSON model artifact loaded at start-up
    pub model_path: String,
    /// Credential file (username -> salted digest)
    pub user_file: String,
    /// Threshold applied when a request does not send one
    pub default_threshold_percent: i64,
    pub session_ttl_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            model_path: "multilabel_model.json".to_string(),
            user_file: "users.json".to_string(),
            default_threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            session_ttl_minutes: 60,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_threshold_percent = parse_or(
            "TAGGER_DEFAULT_THRESHOLD",
            defaults.default_threshold_percent,
        );
        let session_ttl_minutes =
            parse_or("TAGGER_SESSION_TTL_MINUTES", defaults.session_ttl_minutes);

        Self {
            host: env::var("TAGGER_HOST").unwrap_or(defaults.host),
            port: parse_or("TAGGER_PORT", defaults.port),
            model_path: env::var("TAGGER_MODEL_PATH").unwrap_or(defaults.model_path),
            user_file: env::var("TAGGER_USER_FILE").unwrap_or(defaults.user_file),
            default_threshold_percent: if (0..=THRESHOLD_PERCENT_MAX)
                .contains(&default_threshold_percent)
            {
                default_threshold_percent
            } else {
                defaults.default_threshold_percent
            },
            session_ttl_minutes: if session_ttl_minutes > 0 {
                session_ttl_minutes
            } else {
                defaults.session_ttl_minutes
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("Tagger configuration:");
        info!("   Bind address: {}", self.bind_address());
        info!("   Model artifact: {}", self.model_path);
        info!("   User file: {}", self.user_file);
        info!("   Default threshold: {}%", self.default_threshold_percent);
        info!("   Session TTL: {} minutes", self.session_ttl_minutes);
    }
}
