//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_API_URL` - Base URL of the storefront API (default: `http://localhost:8000`)
//! - `VITRINE_STATE_DIR` - Directory for persisted client state
//!   (default: `$HOME/.vitrine`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_STATE_DIR_NAME: &str = ".vitrine";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront API.
    pub api_url: Url,
    /// Directory holding persisted client state (session identity,
    /// credential, cart and compare snapshots).
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `VITRINE_API_URL` is not a valid URL, or
    /// if no state directory can be determined (no `VITRINE_STATE_DIR`
    /// and no `HOME`).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("VITRINE_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_API_URL".to_string(), e.to_string()))?;

        let state_dir = match get_optional_env("VITRINE_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = get_optional_env("HOME")
                    .ok_or_else(|| ConfigError::MissingEnvVar("VITRINE_STATE_DIR".to_string()))?;
                PathBuf::from(home).join(DEFAULT_STATE_DIR_NAME)
            }
        };

        Ok(Self { api_url, state_dir })
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
