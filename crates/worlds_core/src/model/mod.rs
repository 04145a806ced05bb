//! Entity model for the worlds statistics schema.
//!
//! # Responsibility
//! - Define the four record types, their create drafts and update patches.
//! - Provide the shared lifecycle surface used by the soft-delete policy.
//!
//! # Invariants
//! - `id` is assigned by the store and never taken from a draft or patch.
//! - `is_deleted` is the only source of truth for logical existence.
//! - Patches carry no identity or tombstone fields.

use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod champion;
pub mod link;
pub mod match_summary;
pub mod player;
pub mod team;

/// Store-assigned row identifier shared by every entity table.
pub type EntityId = i64;

/// Placeholder id carried by records built from drafts before insertion.
pub const UNASSIGNED_ID: EntityId = 0;

/// The entity types managed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Champion,
    Team,
    MatchSummary,
    Player,
}

impl EntityKind {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Champion => "champions",
            Self::Team => "teams",
            Self::MatchSummary => "match_summaries",
            Self::Player => "players",
        }
    }

    /// Stable lowercase label used in errors and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Champion => "champion",
            Self::Team => "team",
            Self::MatchSummary => "match_summary",
            Self::Player => "player",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Logical state of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Deleted,
}

/// A nullable reference from a record to a team row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamRef {
    /// Column holding the reference, e.g. `winner_id`.
    pub field: &'static str,
    pub team_id: EntityId,
}

/// Behavior shared by every persisted entity.
pub trait Record: Clone {
    const KIND: EntityKind;

    /// Create input, without identity or tombstone.
    type Draft;
    /// Partial update input, without identity or tombstone.
    type Patch;

    /// Builds an unsaved record (id = [`UNASSIGNED_ID`], active).
    fn from_draft(draft: &Self::Draft) -> Self;

    fn id(&self) -> EntityId;

    fn is_deleted(&self) -> bool;

    /// Raw tombstone write. Callers go through the soft-delete policy.
    fn set_deleted(&mut self, deleted: bool);

    /// Merges every present patch field into the record.
    fn apply_patch(&mut self, patch: &Self::Patch);

    fn validate(&self) -> Result<(), ModelValidationError>;

    /// Team references held by this record. Empty for most entities.
    fn team_refs(&self) -> Vec<TeamRef> {
        Vec::new()
    }

    fn lifecycle(&self) -> Lifecycle {
        if self.is_deleted() {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        }
    }
}

/// Field-level validation failure for drafts, patches and stored rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    BlankField(&'static str),
    FieldTooLong { field: &'static str, max_chars: usize },
    NegativeValue(&'static str),
    NonFiniteValue(&'static str),
    UnknownRole(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "`{field}` must be at most {max_chars} characters")
            }
            Self::NegativeValue(field) => write!(f, "`{field}` must not be negative"),
            Self::NonFiniteValue(field) => write!(f, "`{field}` must be a finite number"),
            Self::UnknownRole(value) => write!(f, "unknown player role `{value}`"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) const NAME_MAX_CHARS: usize = 100;
pub(crate) const REGION_MAX_CHARS: usize = 50;

pub(crate) fn check_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField(field));
    }
    if value.chars().count() > max_chars {
        return Err(ModelValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ModelValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelValidationError::NonFiniteValue(field))
    }
}

/// Trims optional free text and maps blank input to `None`.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Distinguishes an absent patch key (`None`) from an explicit `null`
/// (`Some(None)`) for nullable columns.
pub(crate) fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
