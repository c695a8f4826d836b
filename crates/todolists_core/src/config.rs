//! Runtime configuration for backend selection and logging.
//!
//! # Responsibility
//! - Read deployment settings from environment variables.
//! - Pick the persistence backend once at startup.
//!
//! # Invariants
//! - Unknown values are rejected, never silently replaced by defaults.
//! - The production profile only changes defaults; explicit values win.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_PROFILE: &str = "TODOLISTS_ENV";
pub const ENV_BACKEND: &str = "TODOLISTS_BACKEND";
pub const ENV_DATABASE_PATH: &str = "TODOLISTS_DATABASE_PATH";
pub const ENV_LOG_LEVEL: &str = "TODOLISTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TODOLISTS_LOG_DIR";

const DEFAULT_DATABASE_PATH: &str = "todolists.sqlite3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

/// Persistence backend chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Sqlite { db_path: PathBuf },
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub profile: Profile,
    pub backend: Backend,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let profile = match read(ENV_PROFILE).as_deref().map(str::to_ascii_lowercase) {
            None => Profile::Development,
            Some(value) => match value.as_str() {
                "production" => Profile::Production,
                "development" | "test" => Profile::Development,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_PROFILE,
                        value,
                        expected: "production|development|test",
                    })
                }
            },
        };

        let backend = match read(ENV_BACKEND).as_deref().map(str::to_ascii_lowercase) {
            None => sqlite_backend(read(ENV_DATABASE_PATH)),
            Some(value) => match value.as_str() {
                "sqlite" => sqlite_backend(read(ENV_DATABASE_PATH)),
                "session" => Backend::Session,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_BACKEND,
                        value,
                        expected: "sqlite|session",
                    })
                }
            },
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => {
                if !matches!(
                    value.to_ascii_lowercase().as_str(),
                    "trace" | "debug" | "info" | "warn" | "warning" | "error"
                ) {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_LOG_LEVEL,
                        value,
                        expected: "trace|debug|info|warn|error",
                    });
                }
                value
            }
            None if profile == Profile::Production => "info".to_string(),
            None => default_log_level().to_string(),
        };

        Ok(Self {
            profile,
            backend,
            log_level,
            log_dir: read(ENV_LOG_DIR),
        })
    }

    pub fn is_production(&self) -> bool {
        self.profile == Profile::Production
    }
}

fn sqlite_backend(path: Option<String>) -> Backend {
    Backend::Sqlite {
        db_path: PathBuf::from(path.unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, ConfigError, Profile, StoreConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StoreConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        StoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_select_sqlite_in_development() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.profile, Profile::Development);
        assert_eq!(
            config.backend,
            Backend::Sqlite {
                db_path: PathBuf::from("todolists.sqlite3")
            }
        );
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn production_profile_defaults_to_info_logging() {
        let config = config_from(&[("TODOLISTS_ENV", "Production")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.log_level, "info");

        let explicit = config_from(&[
            ("TODOLISTS_ENV", "production"),
            ("TODOLISTS_LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(explicit.log_level, "debug");
    }

    #[test]
    fn session_backend_and_database_path_are_read() {
        let session = config_from(&[("TODOLISTS_BACKEND", "session")]).unwrap();
        assert_eq!(session.backend, Backend::Session);

        let sqlite = config_from(&[("TODOLISTS_DATABASE_PATH", "/tmp/lists.db")]).unwrap();
        assert_eq!(
            sqlite.backend,
            Backend::Sqlite {
                db_path: PathBuf::from("/tmp/lists.db")
            }
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(matches!(
            config_from(&[("TODOLISTS_BACKEND", "postgres")]),
            Err(ConfigError::InvalidValue { key: "TODOLISTS_BACKEND", .. })
        ));
        assert!(matches!(
            config_from(&[("TODOLISTS_ENV", "staging")]),
            Err(ConfigError::InvalidValue { key: "TODOLISTS_ENV", .. })
        ));
        assert!(matches!(
            config_from(&[("TODOLISTS_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidValue { key: "TODOLISTS_LOG_LEVEL", .. })
        ));
    }
}
