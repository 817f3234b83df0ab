//! Runtime configuration.
//!
//! Built once at startup and passed into constructors. Nothing else in the
//! crate reads the process environment.
//!
//! Supported variables:
//! - `CARDIORISK_API_URL`: base address of the scoring/statistics service
//! - `CARDIORISK_PROXY_ADDR`: listen address of the local proxy
//! - `CARDIORISK_LOG_MODE`: `auto` | `file` | `stdout`
//! - `CARDIORISK_LOG_FILE`: log file path used in file mode

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Url;

/// Base address used when `CARDIORISK_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Proxy listen address used when `CARDIORISK_PROXY_ADDR` is not set.
pub const DEFAULT_PROXY_ADDR: &str = "127.0.0.1:3000";

const DEFAULT_LOG_FILE: &str = "cardiorisk.log";

const API_URL_ENV: &str = "CARDIORISK_API_URL";
const PROXY_ADDR_ENV: &str = "CARDIORISK_PROXY_ADDR";
const LOG_MODE_ENV: &str = "CARDIORISK_LOG_MODE";
const LOG_FILE_ENV: &str = "CARDIORISK_LOG_FILE";

/// Errors raised while building the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {API_URL_ENV} {value:?}: {reason}")]
    InvalidApiUrl { value: String, reason: String },

    #[error("Invalid {PROXY_ADDR_ENV} {0:?}")]
    InvalidProxyAddr(String),

    #[error("Invalid {LOG_MODE_ENV} {0:?}: expected auto, file or stdout")]
    InvalidLogMode(String),
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl std::str::FromStr for LogMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(ConfigError::InvalidLogMode(other.to_string())),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Scoring/statistics base address, without trailing slash
    api_base_url: String,

    /// Local proxy listen address
    pub proxy_addr: SocketAddr,

    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            proxy_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// Unset variables take their documented defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `ConfigError` if a present value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            cfg = cfg.with_api_base_url(&url)?;
        }

        if let Some(addr) = lookup(PROXY_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.proxy_addr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidProxyAddr(addr.clone()))?;
        }

        if let Some(mode) = lookup(LOG_MODE_ENV) {
            cfg.log_mode = mode.parse()?;
        }

        if let Some(file) = lookup(LOG_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.log_file = PathBuf::from(file);
        }

        Ok(cfg)
    }

    /// Replace the service base address.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidApiUrl` unless the value is an absolute
    /// http(s) URL.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidApiUrl {
            value: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl {
                value: url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        self.api_base_url = trimmed.to_string();
        Ok(self)
    }

    /// Service base address, without trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// `<base>/predict`
    #[must_use]
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.api_base_url)
    }

    /// `<base>/insights`
    #[must_use]
    pub fn insights_url(&self) -> String {
        format!("{}/insights", self.api_base_url)
    }
}
