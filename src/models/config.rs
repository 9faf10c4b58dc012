// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP fetch behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Season range and source location
    #[serde(default)]
    pub run: RunConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agents.is_empty() {
            return Err(AppError::config("fetch.user_agents is empty"));
        }
        if self.fetch.user_agents.iter().any(|ua| ua.trim().is_empty()) {
            return Err(AppError::config("fetch.user_agents contains a blank entry"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::config("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_retries == 0 {
            return Err(AppError::config("fetch.max_retries must be > 0"));
        }
        if self.run.start_year > self.run.end_year {
            return Err(AppError::config("run.start_year is after run.end_year"));
        }
        if self.run.base_url.trim().is_empty() {
            return Err(AppError::config("run.base_url is empty"));
        }
        Ok(())
    }
}

/// HTTP client behavior: identity pool, politeness delays, retry policy.
///
/// Owned by the fetcher and passed explicitly; there is no process-wide
/// session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Pool of client identity strings, rotated after throttling
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum attempts per URL before giving up
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Base for the exponential backoff schedule, in seconds
    #[serde(default = "defaults::initial_backoff")]
    pub initial_backoff_secs: u64,

    /// Politeness window before fetching a bulk list page, in seconds
    #[serde(default = "defaults::list_delay")]
    pub list_delay_secs: u64,

    /// Politeness window before fetching a per-item page, in seconds
    #[serde(default = "defaults::item_delay")]
    pub item_delay_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agents: defaults::user_agents(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            initial_backoff_secs: defaults::initial_backoff(),
            list_delay_secs: defaults::list_delay(),
            item_delay_secs: defaults::item_delay(),
        }
    }
}

/// Season range and remote source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// First season-end year to harvest
    #[serde(default = "defaults::start_year")]
    pub start_year: i32,

    /// Last season-end year to harvest (inclusive)
    #[serde(default = "defaults::end_year")]
    pub end_year: i32,

    /// Root URL of the reference site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// CSV of (Tm_ID, SeasonEndYear) pairs driving per-team fetches.
    /// Empty means "use the standings output in the output directory".
    #[serde(default)]
    pub team_list_file: String,
}

impl RunConfig {
    /// Inclusive range of season-end years to process.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_year: defaults::start_year(),
            end_year: defaults::end_year(),
            base_url: defaults::base_url(),
            team_list_file: String::new(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the CSV datasets
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum console log level
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Fetch defaults
    pub fn user_agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15".into(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0".into(),
        ]
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        5
    }
    pub fn initial_backoff() -> u64 {
        10
    }
    pub fn list_delay() -> u64 {
        7
    }
    pub fn item_delay() -> u64 {
        4
    }

    // Run defaults
    pub fn start_year() -> i32 {
        2000
    }
    pub fn end_year() -> i32 {
        2024
    }
    pub fn base_url() -> String {
        "https://www.basketball-reference.com".into()
    }

    // Output defaults
    pub fn output_dir() -> String {
        "data/out".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
