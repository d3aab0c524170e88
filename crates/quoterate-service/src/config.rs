//! QuoteRate service configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file (without extension)
pub const CONFIG_PATH_ENV: &str = "QUOTERATE_CONFIG";

/// Default configuration file name
pub const DEFAULT_CONFIG_NAME: &str = "quoterate";

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding the JSON fixture files
    pub fixtures_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Rate only this quote
    pub quote_id: Option<u64>,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("./fixtures"),
            log_level: "info".to_string(),
            quote_id: None,
            pretty: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `.env`, the configuration file and environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_NAME.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from an optional file, then `QUOTERATE_*` variables
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("QUOTERATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}
