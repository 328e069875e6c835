//! Configuration management for SupportDash
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `SUPPORTDASH__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SUPPORTDASH";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Metrics service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// TUI configuration
    #[serde(default)]
    pub tui: TuiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| Error::config(format!("invalid defaults: {e}")))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.service.url.trim().is_empty() {
            return Err(Error::config("service.url must not be empty"));
        }
        if self.service.timeout.is_zero() {
            return Err(Error::config("service.timeout must be greater than zero"));
        }
        if self.tui.tick_rate_ms == 0 {
            return Err(Error::config("tui.tick_rate_ms must be greater than zero"));
        }
        Ok(())
    }
}

/// Metrics service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Endpoint answering `GET ?startDate=..&endDate=..`
    pub url: String,
    /// Upper bound for a single fetch, redirects included
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Redirects followed before giving up
    pub max_redirects: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/exec".to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 5,
        }
    }
}

/// TUI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
    /// Log file used while the dashboard owns the terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Log file for dashboard mode, falling back to the platform data dir
    pub fn dashboard_log_file(&self) -> Option<PathBuf> {
        self.file.clone().or_else(|| {
            directories::ProjectDirs::from("", "", "supportdash")
                .map(|dirs| dirs.data_local_dir().join("supportdash.log"))
        })
    }
}
