//! Cross-entity reference checks.
//!
//! # Invariants
//! - A non-null team reference must name an existing `teams` row.
//! - A soft-deleted team still satisfies a reference; deleting a team does
//!   not cascade to the players or matches pointing at it.

use crate::model::{EntityId, Record};
use crate::repo::gateway::{SqliteGateway, Table};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::OptionalExtension;

/// Verifies every team reference held by `record`.
pub(crate) fn ensure_team_refs_exist<T: Record>(
    gateway: &SqliteGateway<'_>,
    record: &T,
) -> RepoResult<()> {
    for team_ref in record.team_refs() {
        let flag: Option<i64> = gateway
            .connection()
            .query_row(
                "SELECT is_deleted FROM teams WHERE id = ?1;",
                [team_ref.team_id],
                |row| row.get(0),
            )
            .optional()?;

        match flag {
            None => {
                return Err(RepoError::MissingReference {
                    kind: T::KIND,
                    field: team_ref.field,
                    team_id: team_ref.team_id,
                })
            }
            Some(1) => debug!(
                "event=reference_check module=repo status=ok kind={} field={} team_id={} team_deleted=true",
                T::KIND,
                team_ref.field,
                team_ref.team_id
            ),
            Some(_) => {}
        }
    }
    Ok(())
}

/// Loads an active row or fails with `NotFound` tagged with `operation`.
pub(crate) fn require_active<T: Table>(
    gateway: &SqliteGateway<'_>,
    id: EntityId,
    operation: &'static str,
) -> RepoResult<T> {
    gateway
        .get_by_id::<T>(id)?
        .filter(|record| !record.is_deleted())
        .ok_or(RepoError::NotFound {
            kind: T::KIND,
            id,
            operation,
        })
}
