//! Ledger configuration and logging setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::analytics::DateRange;

/// Application-level constants
pub const APP_NAME: &str = "Referral Ledger";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Currency label printed in reports
pub const DEFAULT_CURRENCY: &str = "PKR";

pub fn default_log_filter() -> String {
    "referral_ledger_core=info".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("referral-ledger.sqlite3")
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Range a record view opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRange {
    #[default]
    CurrentMonth,
    AllTime,
}

impl DefaultRange {
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            DefaultRange::CurrentMonth => DateRange::current_month(today),
            DefaultRange::AllTime => DateRange::all_time(),
        }
    }
}

/// Settings read from a JSON file; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub database_path: PathBuf,
    pub currency: String,
    pub log_filter: String,
    pub default_range: DefaultRange,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            currency: default_currency(),
            log_filter: default_log_filter(),
            default_range: DefaultRange::default(),
        }
    }
}

impl LedgerConfig {
    /// Load from a JSON file. Relative database paths resolve against the
    /// config file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: LedgerConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        if config.database_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.database_path = dir.join(&config.database_path);
            }
        }
        Ok(config)
    }

    /// Install the global subscriber with this config's `log_filter`.
    pub fn init_logging(&self) -> bool {
        init_logging(&self.log_filter)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Filter for the subscriber: valid `from_env` directives win over
/// `configured`.
pub fn env_filter(configured: &str, from_env: Option<&str>) -> EnvFilter {
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(configured))
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `filter`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(filter: &str) -> bool {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter, from_env.as_deref()))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", APP_NAME, APP_VERSION);
    }
    installed
}
