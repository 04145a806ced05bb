//! Player table binding and roster filters.

use crate::model::player::{Player, PlayerRole};
use crate::model::EntityId;
use crate::repo::gateway::{parse_flag, Predicate, Table};
use crate::repo::soft_delete::{OnEmpty, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;

pub type PlayerRepository<'conn> = SqliteRepository<'conn, Player>;

impl Table for Player {
    const COLUMNS: &'static [&'static str] = &[
        "nickname",
        "real_name",
        "role",
        "country",
        "team_id",
        "kda",
    ];
    const SEARCH_COLUMN: &'static str = "nickname";

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.nickname.clone()),
            Value::from(self.real_name.clone()),
            Value::Text(self.role.as_code().to_string()),
            Value::from(self.country.clone()),
            Value::from(self.team_id),
            Value::Real(self.kda),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let role_code: String = row.get("role")?;
        let role = PlayerRole::parse(&role_code).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid role `{role_code}` in players.role"))
        })?;

        Ok(Self {
            id: row.get("id")?,
            nickname: row.get("nickname")?,
            real_name: row.get("real_name")?,
            role,
            country: row.get("country")?,
            team_id: row.get("team_id")?,
            kda: row.get("kda")?,
            is_deleted: parse_flag(row, "players")?,
        })
    }
}

impl SqliteRepository<'_, Player> {
    /// Active players in `role`.
    ///
    /// # Errors
    /// - `NoMatches` when no active player has that role.
    pub fn filter_by_role(&self, role: PlayerRole) -> RepoResult<Vec<Player>> {
        self.filter_active(
            Predicate::all().eq("role", role.as_code().to_string()),
            role.as_code(),
            OnEmpty::NoMatches,
        )
    }

    /// Active players on the roster of `team_id`.
    ///
    /// # Errors
    /// - `NoMatches` when the team has no active players.
    pub fn filter_by_team(&self, team_id: EntityId) -> RepoResult<Vec<Player>> {
        self.team_roster(team_id, OnEmpty::NoMatches)
    }

    /// Active roster of `team_id`; empty when nobody is signed.
    pub fn roster(&self, team_id: EntityId) -> RepoResult<Vec<Player>> {
        self.team_roster(team_id, OnEmpty::ReturnEmpty)
    }

    fn team_roster(&self, team_id: EntityId, on_empty: OnEmpty) -> RepoResult<Vec<Player>> {
        self.filter_active(
            Predicate::all().eq("team_id", team_id),
            &format!("team_id={team_id}"),
            on_empty,
        )
    }
}
