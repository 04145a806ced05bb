//! SQLite store bootstrap for the worlds statistics schema.
//!
//! # Responsibility
//! - Open and configure connections shared by every repository.
//! - Bring the schema up to date before any entity data is touched.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Foreign keys are enforced on every connection handed out.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure raised by the store itself rather than by a domain rule.
#[derive(Debug)]
pub enum DbError {
    /// Statement, connection or transaction failure reported by SQLite.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; it is never downgraded.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A schema step failed; nothing from the batch was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Whether SQLite rejected a write on a UNIQUE, CHECK or FOREIGN KEY
    /// constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "storage error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "stats store is at schema version {db_version}; this build reads up to {latest_supported}"
            ),
            Self::Migration { version, source } => {
                write!(f, "schema migration to version {version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
