//! Shared configuration for the tweetpulse workspace.
//!
//! Loads application settings and API credentials from environment variables
//! (with `.env` support). Credentials are plain opaque strings to the rest of
//! the workspace and are redacted from all `Debug` output.

mod app_config;
mod config;

use thiserror::Error;

pub use app_config::{AppConfig, Credentials, Environment};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
