//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const CREDENTIALS_DIR_NAME: &str = ".coursebook";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    /// `None` means no chat endpoint is configured and the widget runs in demo mode.
    pub chat_api_base_url: Option<Url>,
    /// `None` means there is nowhere durable to keep credentials.
    pub credentials_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub chat_demo_delay: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        // --- Load Backend Endpoints ---
        let api_base_url = parse_url(
            "API_BASE_URL",
            &var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let chat_api_base_url = match lookup("CHAT_API_BASE_URL") {
            None => Some(api_base_url.clone()),
            Some(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("disabled") => {
                None
            }
            Some(raw) => Some(parse_url("CHAT_API_BASE_URL", &raw)?),
        };

        // --- Load Storage Settings ---
        let credentials_dir = var("CREDENTIALS_DIR")
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(CREDENTIALS_DIR_NAME)));

        // --- Load Timing Settings ---
        let request_timeout = Duration::from_secs(parse_number(
            "REQUEST_TIMEOUT_SECS",
            var("REQUEST_TIMEOUT_SECS"),
            30,
        )?);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let chat_demo_delay = Duration::from_millis(parse_number(
            "CHAT_DEMO_DELAY_MS",
            var("CHAT_DEMO_DELAY_MS"),
            1000,
        )?);

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            chat_api_base_url,
            credentials_dir,
            request_timeout,
            chat_demo_delay,
            log_level,
        })
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not an http(s) URL", raw.trim()),
        ));
    }
    Ok(url)
}

fn parse_number(name: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue(name.to_string(), format!("'{}': {}", raw.trim(), e))
        }),
    }
}
