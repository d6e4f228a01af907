//! Runtime configuration resolved from the environment.
//!
//! | variable             | default                          |
//! |----------------------|----------------------------------|
//! | `HOMELIST_DB_PATH`   | `<temp dir>/homelist.sqlite3`    |
//! | `HOMELIST_LOG_LEVEL` | [`default_log_level`]            |
//! | `HOMELIST_LOG_DIR`   | unset (file logging disabled)    |
//!
//! Blank values count as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "HOMELIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "HOMELIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "HOMELIST_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "homelist.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = config_from(&[(DB_PATH_ENV, "   ")]);
        assert_eq!(config.db_path, std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed() {
        let config = config_from(&[
            (DB_PATH_ENV, " /data/home.sqlite3 "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/homelist"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/home.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/homelist")));
    }
}
