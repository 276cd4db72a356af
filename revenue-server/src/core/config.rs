//! Server configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/revenue/data | working directory (database, logs) |
//! | HTTP_PORT | 8080 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | FX_API_URL | https://api.exchangerate.host | FX live-quote endpoint base |
//! | FX_ACCESS_KEY | (empty) | FX provider access key |
//! | MARKET_API_URL | https://api.coingecko.com/api/v3 | market-data endpoint base |
//! | PROVIDER_TIMEOUT_MS | 10000 | timeout for provider HTTP calls |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// FX provider base URL (live quotes)
    pub fx_api_url: String,
    /// FX provider access key
    pub fx_access_key: String,
    /// Market-data provider base URL (historical crypto prices)
    pub market_api_url: String,
    /// Timeout for external provider calls (milliseconds)
    pub provider_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/revenue/data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            fx_api_url: std::env::var("FX_API_URL")
                .unwrap_or_else(|_| "https://api.exchangerate.host".into()),
            fx_access_key: std::env::var("FX_ACCESS_KEY").unwrap_or_default(),
            market_api_url: std::env::var("MARKET_API_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".into()),
            provider_timeout_ms: std::env::var("PROVIDER_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Override the mutable parts (tests, local runs)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Directory holding the embedded database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Make sure the working directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
