//! Environment-sourced runtime configuration.
//!
//! # Responsibility
//! - Collect database and logging settings for the demonstration driver.
//!
//! # Invariants
//! - Every setting has a default; only malformed values are errors.
//! - Parsing never touches the filesystem or the database.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "ALBUMS_DB_PATH";
pub const ENV_DB_TIMEOUT_SECS: &str = "ALBUMS_DB_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "ALBUMS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ALBUMS_LOG_DIR";
pub const ENV_SEED: &str = "ALBUMS_SEED";

const DEFAULT_DB_FILE_NAME: &str = "recordings.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "albums-logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for one driver run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// Seed the sample catalog when the album table is empty.
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            seed_sample_data: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ENV_DB_TIMEOUT_SECS) {
            config.busy_timeout = parse_timeout_secs(&raw)?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_SEED) {
            config.seed_sample_data = parse_flag(ENV_SEED, &raw)?;
        }

        Ok(config)
    }
}

fn parse_timeout_secs(raw: &str) -> ConfigResult<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_DB_TIMEOUT_SECS,
            value: raw.to_string(),
            reason: "expected a positive number of seconds",
        }),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> ConfigResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected 1|0|true|false|yes|no|on|off",
        }),
    }
}
