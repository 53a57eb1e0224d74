//! Console configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Every value has a default, so the library runs without any environment set.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_LEADERBOARD_PAGE_SIZE, DEFAULT_LEADERBOARD_POLL_SECS, DEFAULT_PAGE_SIZE,
    DEFAULT_SUBMISSIONS_BATCH, DEFAULT_TESTCASE_MAX_COUNT, MAX_PAGE_SIZE,
};

/// Global console configuration (lazily initialized)
pub static CONFIG: LazyLock<AdminConfig> = LazyLock::new(|| {
    AdminConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default configuration: {}", e);
        AdminConfig::default()
    })
});

/// Main console configuration
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub log: LogConfig,
    pub listing: ListingConfig,
    pub leaderboard: LeaderboardConfig,
    pub testcases: TestcaseConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue("ADMIN_LOG_FORMAT".to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub rust_log: String,
    pub format: LogFormat,
}

/// Table and feed sizing
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub page_size: u32,
    pub submissions_batch: u32,
}

/// Leaderboard polling configuration
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub poll_interval: Duration,
    pub page_size: u32,
}

/// Test-case file acceptance configuration
#[derive(Debug, Clone)]
pub struct TestcaseConfig {
    /// Largest number of records accepted in one file
    pub max_count: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            rust_log: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            submissions_batch: DEFAULT_SUBMISSIONS_BATCH,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_LEADERBOARD_POLL_SECS),
            page_size: DEFAULT_LEADERBOARD_PAGE_SIZE,
        }
    }
}

impl Default for TestcaseConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_TESTCASE_MAX_COUNT,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            log: LogConfig::from_env()?,
            listing: ListingConfig::from_env()?,
            leaderboard: LeaderboardConfig::from_env()?,
            testcases: TestcaseConfig::from_env()?,
        })
    }
}

impl LogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("ADMIN_LOG_FORMAT") {
                Ok(value) => value.parse()?,
                Err(_) => LogFormat::Pretty,
            },
        })
    }
}

impl ListingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let page_size: u32 = parse_var("ADMIN_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue("ADMIN_PAGE_SIZE".to_string()));
        }

        let submissions_batch: u32 = parse_var("ADMIN_SUBMISSIONS_BATCH", DEFAULT_SUBMISSIONS_BATCH)?;
        if submissions_batch == 0 {
            return Err(ConfigError::InvalidValue("ADMIN_SUBMISSIONS_BATCH".to_string()));
        }

        Ok(Self {
            page_size,
            submissions_batch,
        })
    }
}

impl LeaderboardConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secs: u64 = parse_var("ADMIN_LEADERBOARD_POLL_SECS", DEFAULT_LEADERBOARD_POLL_SECS)?;
        if secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ADMIN_LEADERBOARD_POLL_SECS".to_string(),
            ));
        }

        Ok(Self {
            poll_interval: Duration::from_secs(secs),
            page_size: parse_var("ADMIN_LEADERBOARD_PAGE_SIZE", DEFAULT_LEADERBOARD_PAGE_SIZE)?,
        })
    }
}

impl TestcaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_count: parse_var("ADMIN_TESTCASE_MAX_COUNT", DEFAULT_TESTCASE_MAX_COUNT)?,
        })
    }
}

fn parse_var<T: FromStr + ToString>(name: &str, default: T) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
