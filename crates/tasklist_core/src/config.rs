//! Process configuration loaded from the environment.
//!
//! # Responsibility
//! - Collect store, credential, access policy and logging settings once at
//!   startup.
//!
//! # Invariants
//! - The token secret is required and never printed (`Debug` redacts it).
//! - Invalid values fail loading instead of silently falling back.

use crate::auth::PasswordSettings;
use crate::logging::default_log_level;
use crate::service::guard::AccessPolicy;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKLIST_DB_PATH";
pub const ENV_JWT_SECRET: &str = "TASKLIST_JWT_SECRET";
pub const ENV_LOG_LEVEL: &str = "TASKLIST_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKLIST_LOG_DIR";
pub const ENV_ACCESS_POLICY: &str = "TASKLIST_ACCESS_POLICY";
pub const ENV_ARGON2_MEMORY_KIB: &str = "TASKLIST_ARGON2_MEMORY_KIB";
pub const ENV_ARGON2_ITERATIONS: &str = "TASKLIST_ARGON2_ITERATIONS";
pub const ENV_ARGON2_PARALLELISM: &str = "TASKLIST_ARGON2_PARALLELISM";

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting {key}"),
            Self::Invalid { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for one service process.
#[derive(Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub access_policy: AccessPolicy,
    pub password: PasswordSettings,
}

impl Debug for ServiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("db_path", &self.db_path)
            .field("jwt_secret", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("access_policy", &self.access_policy)
            .field("password", &self.password)
            .finish()
    }
}

impl ServiceConfig {
    /// Loads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let jwt_secret = get(ENV_JWT_SECRET).ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;

        let access_policy = match get(ENV_ACCESS_POLICY) {
            Some(value) => {
                value
                    .parse::<AccessPolicy>()
                    .map_err(|err| ConfigError::Invalid {
                        key: ENV_ACCESS_POLICY,
                        value: value.clone(),
                        reason: err.to_string(),
                    })?
            }
            None => AccessPolicy::default(),
        };

        let log_dir = match get(ENV_LOG_DIR) {
            Some(value) => {
                let path = PathBuf::from(&value);
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        key: ENV_LOG_DIR,
                        value,
                        reason: "log directory must be an absolute path".to_string(),
                    });
                }
                Some(path)
            }
            None => None,
        };

        let defaults = PasswordSettings::default();
        let password = PasswordSettings {
            memory_kib: parse_u32(&get, ENV_ARGON2_MEMORY_KIB, defaults.memory_kib)?,
            iterations: parse_u32(&get, ENV_ARGON2_ITERATIONS, defaults.iterations)?,
            parallelism: parse_u32(&get, ENV_ARGON2_PARALLELISM, defaults.parallelism)?,
        };

        Ok(Self {
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
            jwt_secret,
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            access_policy,
            password,
        })
    }
}

fn parse_u32(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse::<u32>().map_err(|err| ConfigError::Invalid {
            key,
            value,
            reason: err.to_string(),
        }),
    }
}
