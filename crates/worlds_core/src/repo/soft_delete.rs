//! Soft-delete policy and the generic entity repository built on it.
//!
//! # Responsibility
//! - Define the Active ↔ Deleted state machine and its guards.
//! - Implement create/list/search/get/update/delete/restore once for every
//!   [`Table`] type.
//!
//! # Invariants
//! - Delete is valid only on an active row; restore only on a deleted row.
//! - `get`, `update`, `search` and default listings treat deleted rows as
//!   absent.
//! - Transitions flip `is_deleted` only; no row is ever physically removed.

use crate::model::{EntityId, Lifecycle, Record};
use crate::repo::gateway::{Page, Predicate, SqliteGateway, Table};
use crate::repo::references::{ensure_team_refs_exist, require_active};
use crate::repo::{normalize_list_limit, ListQuery, RepoError, RepoResult};
use log::info;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

/// A guarded change of [`Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Delete,
    Restore,
}

impl Transition {
    /// State the row must be in for the transition to apply.
    pub fn source(self) -> Lifecycle {
        match self {
            Self::Delete => Lifecycle::Active,
            Self::Restore => Lifecycle::Deleted,
        }
    }

    pub fn target(self) -> Lifecycle {
        match self {
            Self::Delete => Lifecycle::Deleted,
            Self::Restore => Lifecycle::Active,
        }
    }

    /// Operation name used in errors.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Restore => "restore",
        }
    }

    fn event(self) -> &'static str {
        match self {
            Self::Delete => "entity_delete",
            Self::Restore => "entity_restore",
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.operation())
    }
}

/// Predicate for default reads: active rows, or every row when
/// `include_deleted` is set.
pub fn active_filter(include_deleted: bool) -> Predicate {
    if include_deleted {
        Predicate::all()
    } else {
        Predicate::active_only()
    }
}

/// Applies `transition` to an in-memory record if its guard holds.
pub fn apply_transition<T: Record>(record: &mut T, transition: Transition) -> RepoResult<()> {
    if record.lifecycle() != transition.source() {
        return Err(RepoError::InvalidState {
            kind: T::KIND,
            id: record.id(),
            transition,
        });
    }
    record.set_deleted(transition.target() == Lifecycle::Deleted);
    Ok(())
}

/// What a filter reports when no active row matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnEmpty {
    ReturnEmpty,
    NoMatches,
}

/// Entity operations shared by champions, teams, match summaries and
/// players.
pub trait SoftDeleteRepository<T: Record> {
    /// Inserts a new active row and returns it with its assigned id.
    fn create(&self, draft: &T::Draft) -> RepoResult<T>;
    /// Id-ordered page of rows.
    fn list(&self, query: &ListQuery) -> RepoResult<Vec<T>>;
    /// Every soft-deleted row, unpaginated.
    fn list_deleted(&self) -> RepoResult<Vec<T>>;
    fn restore(&self, id: EntityId) -> RepoResult<()>;
    /// Case-insensitive substring search on the name-like column.
    fn search(&self, text: &str) -> RepoResult<Vec<T>>;
    fn get(&self, id: EntityId) -> RepoResult<T>;
    /// Merges a partial patch; identity and tombstone are never touched.
    fn update(&self, id: EntityId, patch: &T::Patch) -> RepoResult<T>;
    fn soft_delete(&self, id: EntityId) -> RepoResult<()>;
    fn count(&self, include_deleted: bool) -> RepoResult<u64>;
}

/// SQLite-backed [`SoftDeleteRepository`] for any [`Table`] type.
pub struct SqliteRepository<'conn, T> {
    gateway: SqliteGateway<'conn>,
    _record: PhantomData<fn() -> T>,
}

impl<'conn, T: Table> SqliteRepository<'conn, T> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::from_gateway(SqliteGateway::try_new(conn)?))
    }

    pub(crate) fn from_gateway(gateway: SqliteGateway<'conn>) -> Self {
        Self {
            gateway,
            _record: PhantomData,
        }
    }

    pub(crate) fn gateway(&self) -> &SqliteGateway<'conn> {
        &self.gateway
    }

    /// Active rows matching `predicate`, id-ordered.
    pub(crate) fn filter_active(
        &self,
        predicate: Predicate,
        query: &str,
        on_empty: OnEmpty,
    ) -> RepoResult<Vec<T>> {
        let records = self.gateway.query::<T>(&predicate.clause("is_deleted = 0"), None)?;
        if records.is_empty() && on_empty == OnEmpty::NoMatches {
            return Err(RepoError::NoMatches {
                kind: T::KIND,
                query: query.to_string(),
            });
        }
        Ok(records)
    }

    fn transition(&self, id: EntityId, transition: Transition) -> RepoResult<()> {
        self.gateway
            .transaction(T::KIND, transition.event(), |gateway| {
                let mut record = gateway
                    .get_by_id::<T>(id)?
                    .ok_or(RepoError::NotFound {
                        kind: T::KIND,
                        id,
                        operation: transition.operation(),
                    })?;
                apply_transition(&mut record, transition)?;
                gateway.update(&record)
            })?;

        info!(
            "event={} module=repo status=ok kind={} id={id}",
            transition.event(),
            T::KIND
        );
        Ok(())
    }
}

impl<T: Table> SoftDeleteRepository<T> for SqliteRepository<'_, T> {
    fn create(&self, draft: &T::Draft) -> RepoResult<T> {
        let candidate = T::from_draft(draft);
        candidate.validate()?;

        let created = self
            .gateway
            .transaction(T::KIND, "entity_create", |gateway| {
                ensure_team_refs_exist(gateway, &candidate)?;
                gateway.insert(&candidate)
            })?;

        info!(
            "event=entity_create module=repo status=ok kind={} id={}",
            T::KIND,
            created.id()
        );
        Ok(created)
    }

    fn list(&self, query: &ListQuery) -> RepoResult<Vec<T>> {
        let page = Page {
            offset: query.offset,
            limit: normalize_list_limit(query.limit),
        };
        self.gateway
            .query(&active_filter(query.include_deleted), Some(page))
    }

    fn list_deleted(&self) -> RepoResult<Vec<T>> {
        self.gateway.query(&Predicate::deleted_only(), None)
    }

    fn restore(&self, id: EntityId) -> RepoResult<()> {
        self.transition(id, Transition::Restore)
    }

    fn search(&self, text: &str) -> RepoResult<Vec<T>> {
        let needle = text.trim();
        if needle.is_empty() {
            return Err(RepoError::InvalidArgument {
                kind: T::KIND,
                message: "search text must not be blank".to_string(),
            });
        }
        self.filter_active(
            Predicate::all().contains(T::SEARCH_COLUMN, needle),
            needle,
            OnEmpty::NoMatches,
        )
    }

    fn get(&self, id: EntityId) -> RepoResult<T> {
        require_active(&self.gateway, id, "get")
    }

    fn update(&self, id: EntityId, patch: &T::Patch) -> RepoResult<T> {
        let updated = self
            .gateway
            .transaction(T::KIND, "entity_update", |gateway| {
                let mut record = require_active::<T>(gateway, id, "update")?;
                record.apply_patch(patch);
                record.validate()?;
                ensure_team_refs_exist(gateway, &record)?;
                gateway.update(&record)?;
                Ok(record)
            })?;

        info!("event=entity_update module=repo status=ok kind={} id={id}", T::KIND);
        Ok(updated)
    }

    fn soft_delete(&self, id: EntityId) -> RepoResult<()> {
        self.transition(id, Transition::Delete)
    }

    fn count(&self, include_deleted: bool) -> RepoResult<u64> {
        self.gateway.count::<T>(&active_filter(include_deleted))
    }
}
