//! Process configuration for the content store.
//!
//! # Responsibility
//! - Describe where content is stored and whether defaults are seeded.
//! - Load settings from JSON or from `SITECONTENT_*` environment variables.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Invalid values are rejected with the offending key, never ignored.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB: &str = "SITECONTENT_DB";
pub const ENV_SEED: &str = "SITECONTENT_SEED";
pub const ENV_LOG_LEVEL: &str = "SITECONTENT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SITECONTENT_LOG_DIR";
pub const ENV_NOTIFY_TO: &str = "SITECONTENT_NOTIFY_TO";

const MEMORY_DB: &str = ":memory:";

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Backing storage for the content store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DatabaseLocation {
    /// Content lives for the process lifetime; defaults return on restart.
    #[default]
    Memory,
    /// SQLite file; admin edits survive restarts.
    File { path: PathBuf },
}

/// Content store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    pub database: DatabaseLocation,
    /// Runs the seed initializer during `ContentStore::init`.
    pub seed_on_start: bool,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    /// Recipient for submission notifications.
    pub notification_recipient: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            seed_on_start: true,
            log_level: default_log_level().to_string(),
            log_dir: None,
            notification_recipient: None,
        }
    }
}

impl CoreConfig {
    /// Parses a camelCase JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        normalize_level(&config.log_level).map_err(|_| ConfigError::InvalidValue {
            key: "logLevel",
            value: config.log_level.clone(),
        })?;
        Ok(config)
    }

    /// Reads `SITECONTENT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = non_blank(lookup(ENV_DB)) {
            config.database = if value == MEMORY_DB {
                DatabaseLocation::Memory
            } else {
                DatabaseLocation::File {
                    path: PathBuf::from(value),
                }
            };
        }

        if let Some(value) = non_blank(lookup(ENV_SEED)) {
            config.seed_on_start = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_SEED,
                        value,
                    });
                }
            };
        }

        if let Some(value) = non_blank(lookup(ENV_LOG_LEVEL)) {
            let level = normalize_level(&value).map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: value.clone(),
            })?;
            config.log_level = level.to_string();
        }

        config.log_dir = non_blank(lookup(ENV_LOG_DIR)).map(PathBuf::from);
        config.notification_recipient = non_blank(lookup(ENV_NOTIFY_TO));
        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
