//! Repository layer over the SQLite store.
//!
//! # Responsibility
//! - Own SQL, transaction scopes and row decoding for every entity.
//! - Apply the soft-delete policy uniformly through one generic repository.
//! - Report domain conditions (`NotFound`, `InvalidState`, ...) separately
//!   from storage failures.
//!
//! # Invariants
//! - Default reads never return rows with `is_deleted = 1`.
//! - Mutations run in one immediate transaction and roll back on any error.

use crate::db::DbError;
use crate::model::{EntityId, EntityKind, ModelValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod champion_repo;
pub mod gateway;
pub mod match_repo;
pub mod player_repo;
pub mod references;
pub mod soft_delete;
pub mod team_repo;

use soft_delete::Transition;

/// Default page size for listings.
pub const LIST_DEFAULT_LIMIT: u32 = 10;
/// Largest page size a listing will return.
pub const LIST_LIMIT_MAX: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Row is missing or soft-deleted when `operation` needed it.
    NotFound {
        kind: EntityKind,
        id: EntityId,
        operation: &'static str,
    },
    /// Delete on a deleted row, or restore on an active row.
    InvalidState {
        kind: EntityKind,
        id: EntityId,
        transition: Transition,
    },
    InvalidArgument { kind: EntityKind, message: String },
    /// Search or categorical filter matched no active row.
    NoMatches { kind: EntityKind, query: String },
    /// A team reference points at an id with no team row.
    MissingReference {
        kind: EntityKind,
        field: &'static str,
        team_id: EntityId,
    },
    Validation(ModelValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Whether this error came from the store rather than a domain rule.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Db(_) | Self::InvalidData(_))
    }

    /// Storage failure caused by a UNIQUE, CHECK or FOREIGN KEY rule,
    /// e.g. a duplicate slug or team name.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                kind,
                id,
                operation,
            } => write!(f, "{kind} not found: {id} (operation={operation})"),
            Self::InvalidState {
                kind,
                id,
                transition,
            } => match transition {
                Transition::Delete => write!(f, "{kind} {id} is already deleted"),
                Transition::Restore => write!(f, "{kind} {id} is not deleted"),
            },
            Self::InvalidArgument { kind, message } => {
                write!(f, "invalid {kind} argument: {message}")
            }
            Self::NoMatches { kind, query } => write!(f, "no {kind} matches `{query}`"),
            Self::MissingReference {
                kind,
                field,
                team_id,
            } => write!(f, "{kind}.{field} references missing team {team_id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing options shared by every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub include_deleted: bool,
    /// Page size. Defaults to 10 and clamps to 100.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    pub fn page(offset: u32, limit: u32) -> Self {
        Self {
            include_deleted: false,
            limit: Some(limit),
            offset,
        }
    }
}

/// Normalizes a requested page size.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => LIST_DEFAULT_LIMIT,
        Some(value) => value.min(LIST_LIMIT_MAX),
    }
}
