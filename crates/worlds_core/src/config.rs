//! Environment-driven runtime configuration.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "WORLDS_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "WORLDS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "WORLDS_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` selects an in-memory store.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `WORLDS_DB_PATH`, `WORLDS_LOG_LEVEL` and `WORLDS_LOG_DIR`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source. Blank values count as unset.
    ///
    /// # Errors
    /// - Unknown log level names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level)?.to_string(),
            None => default_log_level().to_string(),
        };

        Ok(Self {
            db_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        })
    }

    /// Opens and migrates the configured store.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }

    /// Starts file logging when a directory is configured.
    ///
    /// Returns `Ok(false)` when logging stays off.
    pub fn init_logging(&self) -> Result<bool, String> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn variables_are_read_and_trimmed() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, " /tmp/worlds.sqlite3 "),
            (LOG_LEVEL_VAR, "WARNING"),
            (LOG_DIR_VAR, "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/worlds.sqlite3")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let error = CoreConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "loud")])).unwrap_err();
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn in_memory_store_opens_without_a_path() {
        let conn = CoreConfig::default().open_store().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'teams';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
