//! Team table binding and team-only queries.

use crate::model::team::Team;
use crate::model::{EntityId, EntityKind};
use crate::repo::gateway::{parse_flag, Predicate, Table};
use crate::repo::soft_delete::{OnEmpty, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;
use std::collections::HashMap;

pub type TeamRepository<'conn> = SqliteRepository<'conn, Team>;

impl Table for Team {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "region",
        "wins",
        "losses",
        "avg_kda",
        "favorite_champions",
    ];
    const SEARCH_COLUMN: &'static str = "name";

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.region.clone()),
            Value::Integer(self.wins),
            Value::Integer(self.losses),
            Value::Real(self.avg_kda),
            Value::from(self.favorite_champions.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            region: row.get("region")?,
            wins: row.get("wins")?,
            losses: row.get("losses")?,
            avg_kda: row.get("avg_kda")?,
            favorite_champions: row.get("favorite_champions")?,
            is_deleted: parse_flag(row, "teams")?,
        })
    }
}

impl SqliteRepository<'_, Team> {
    /// Active teams whose region equals `region`.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank region.
    /// - `NoMatches` when no active team is registered in the region.
    pub fn filter_by_region(&self, region: &str) -> RepoResult<Vec<Team>> {
        let region = region.trim();
        if region.is_empty() {
            return Err(RepoError::InvalidArgument {
                kind: EntityKind::Team,
                message: "region must not be blank".to_string(),
            });
        }
        self.filter_active(
            Predicate::all().eq("region", region.to_string()),
            region,
            OnEmpty::NoMatches,
        )
    }

    /// Active team ids keyed by exact team name.
    pub fn ids_by_name(&self) -> RepoResult<HashMap<String, EntityId>> {
        let teams = self.gateway().query::<Team>(&Predicate::active_only(), None)?;
        Ok(teams.into_iter().map(|team| (team.name, team.id)).collect())
    }

    /// Active team names keyed by id.
    pub fn names_by_id(&self) -> RepoResult<HashMap<EntityId, String>> {
        let teams = self.gateway().query::<Team>(&Predicate::active_only(), None)?;
        Ok(teams.into_iter().map(|team| (team.id, team.name)).collect())
    }
}
