//! Shop client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOP_API_URL` - Base URL of the shop backend (default: `http://127.0.0.1:5000/`)
//! - `SHOP_DATA_DIR` - Directory holding the persisted cart and session (default: `.mobile-shop`)
//! - `SHOP_REDIRECT_DELAY_MS` - Delay before leaving the page after checkout (default: 1000)
//! - `SHOP_NOTIFICATION_TTL_SECS` - Lifetime of toast notifications (default: 3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_DATA_DIR: &str = ".mobile-shop";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;
const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Backend base URL; always ends in `/` so relative joins keep its path
    pub api_base_url: Url,
    /// Directory for the file-backed persistence store
    pub data_dir: PathBuf,
    /// How long the checkout confirmation stays before navigating away
    pub redirect_delay: Duration,
    /// How long toast notifications stay visible
    pub notification_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

impl ShopConfig {
    /// Configuration with defaults for everything except the backend URL.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url: with_trailing_slash(api_base_url),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_TTL_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = Url::parse(&get_env_or_default("SHOP_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_API_URL".to_string(), e.to_string()))?;

        let redirect_delay = Duration::from_millis(parse_u64(
            "SHOP_REDIRECT_DELAY_MS",
            &get_env_or_default(
                "SHOP_REDIRECT_DELAY_MS",
                &DEFAULT_REDIRECT_DELAY_MS.to_string(),
            ),
        )?);
        let notification_ttl = Duration::from_secs(parse_u64(
            "SHOP_NOTIFICATION_TTL_SECS",
            &get_env_or_default(
                "SHOP_NOTIFICATION_TTL_SECS",
                &DEFAULT_NOTIFICATION_TTL_SECS.to_string(),
            ),
        )?);

        Ok(Self {
            api_base_url: with_trailing_slash(api_base_url),
            data_dir: PathBuf::from(get_env_or_default("SHOP_DATA_DIR", DEFAULT_DATA_DIR)),
            redirect_delay,
            notification_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a non-negative integer setting.
fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Make sure `Url::join` appends to the base path instead of replacing its
/// last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
