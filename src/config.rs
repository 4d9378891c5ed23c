//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any file is
//! touched.
//!
//! ## Required Variables
//!
//! - `INGEST_URL` - Event-ingestion endpoint (HTTP or HTTPS)
//! - `API_TOKEN` - Bearer token for the endpoint
//!
//! ## Optional Variables
//!
//! - `INPUT_DIR` - Directory of CSV export files (default: `files`)
//! - `EVENT_NAME` - Name attached to every event (default: empty)
//! - `RATE_LIMIT_INTERVAL_MS` - Minimum spacing between request starts (default: 100)
//! - `ROW_DELAY_MS` - Extra pause after each delivered row (default: 100)
//! - `HTTP_TIMEOUT_SECS` - Outbound request timeout (default: 30)
//! - `RUST_LOG` - Log level (default: `info`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub ingest_url: String,
    pub api_token: String,
    /// Event name sent with every payload. May be empty; some ingestion
    /// setups key events entirely off their properties.
    pub event_name: String,
    /// Minimum spacing between consecutive request starts, in milliseconds.
    pub rate_limit_interval_ms: u64,
    /// Extra pause after each delivered row, stacked on the rate limit.
    pub row_delay_ms: u64,
    pub http_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `INGEST_URL` or `API_TOKEN` is missing.
    pub fn from_env() -> Result<Self> {
        let ingest_url = env::var("INGEST_URL").context("INGEST_URL must be set")?;
        let api_token = env::var("API_TOKEN").context("API_TOKEN must be set")?;

        let input_dir = env::var("INPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("files"));

        let event_name = env::var("EVENT_NAME").unwrap_or_default();

        let rate_limit_interval_ms = env::var("RATE_LIMIT_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let row_delay_ms = env::var("ROW_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            input_dir,
            ingest_url,
            api_token,
            event_name,
            rate_limit_interval_ms,
            row_delay_ms,
            http_timeout_secs,
            log_level,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `INGEST_URL` is not an HTTP(S) URL
    /// - `API_TOKEN` is empty
    /// - `HTTP_TIMEOUT_SECS` is zero
    pub fn validate(&self) -> Result<()> {
        if !self.ingest_url.starts_with("http://") && !self.ingest_url.starts_with("https://") {
            anyhow::bail!(
                "INGEST_URL must start with 'http://' or 'https://', got '{}'",
                self.ingest_url
            );
        }

        if self.api_token.is_empty() {
            anyhow::bail!("API_TOKEN must not be empty");
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn row_delay(&self) -> Duration {
        Duration::from_millis(self.row_delay_ms)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Input directory: {}", self.input_dir.display());
        tracing::info!("  Ingest endpoint: {}", self.ingest_url);
        tracing::info!("  API token: {}", mask_token(&self.api_token));
        tracing::info!("  Event name: '{}'", self.event_name);
        tracing::info!("  Rate limit interval: {}ms", self.rate_limit_interval_ms);
        tracing::info!("  Row delay: {}ms", self.row_delay_ms);
        tracing::info!("  Log level: {}", self.log_level);
    }
}

/// Masks a bearer token for logging, keeping only a short prefix.
fn mask_token(token: &str) -> String {
    if token.len() <= 4 {
        return "***".to_string();
    }
    format!("{}***", &token[..4])
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
