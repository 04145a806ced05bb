//! Champion table binding and champion-only queries.

use crate::model::champion::Champion;
use crate::model::match_summary::MatchSummary;
use crate::model::{EntityId, EntityKind};
use crate::repo::gateway::{parse_flag, Predicate, Table};
use crate::repo::references::require_active;
use crate::repo::soft_delete::{OnEmpty, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;

pub type ChampionRepository<'conn> = SqliteRepository<'conn, Champion>;

impl Table for Champion {
    const COLUMNS: &'static [&'static str] =
        &["slug", "name", "pick_rate", "ban_rate", "win_rate", "kda"];
    const SEARCH_COLUMN: &'static str = "name";

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.slug.clone()),
            Value::Text(self.name.clone()),
            Value::Real(self.pick_rate),
            Value::Real(self.ban_rate),
            Value::Real(self.win_rate),
            Value::Real(self.kda),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            slug: row.get("slug")?,
            name: row.get("name")?,
            pick_rate: row.get("pick_rate")?,
            ban_rate: row.get("ban_rate")?,
            win_rate: row.get("win_rate")?,
            kda: row.get("kda")?,
            is_deleted: parse_flag(row, "champions")?,
        })
    }
}

impl SqliteRepository<'_, Champion> {
    /// Active champions with `win_rate >= min_win_rate`.
    ///
    /// # Errors
    /// - `InvalidArgument` for a negative or non-finite threshold.
    pub fn filter_by_min_win_rate(&self, min_win_rate: f64) -> RepoResult<Vec<Champion>> {
        if !min_win_rate.is_finite() || min_win_rate < 0.0 {
            return Err(RepoError::InvalidArgument {
                kind: EntityKind::Champion,
                message: format!("min_win_rate must be a non-negative number, got {min_win_rate}"),
            });
        }
        self.filter_active(
            Predicate::all().at_least("win_rate", min_win_rate),
            &min_win_rate.to_string(),
            OnEmpty::ReturnEmpty,
        )
    }

    /// Active matches in which an active champion was played.
    pub fn matches_for_champion(&self, champion_id: EntityId) -> RepoResult<Vec<MatchSummary>> {
        require_active::<Champion>(self.gateway(), champion_id, "matches_for_champion")?;
        self.gateway().query(
            &Predicate::active_only().member_of(
                "id",
                "SELECT match_id FROM match_champion_links WHERE champion_id = ?",
                champion_id,
            ),
            None,
        )
    }
}
