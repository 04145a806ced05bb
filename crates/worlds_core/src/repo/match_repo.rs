//! Match summary table binding, winner filter and champion links.
//!
//! # Invariants
//! - A link row is only created between an active match and an active
//!   champion.
//! - Link reads return active champions of active matches only.

use crate::model::champion::Champion;
use crate::model::link::MatchChampionLink;
use crate::model::match_summary::MatchSummary;
use crate::model::{EntityId, EntityKind};
use crate::repo::gateway::{parse_flag, Predicate, Table};
use crate::repo::references::require_active;
use crate::repo::soft_delete::{OnEmpty, SqliteRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, Row};

pub type MatchSummaryRepository<'conn> = SqliteRepository<'conn, MatchSummary>;

impl Table for MatchSummary {
    const COLUMNS: &'static [&'static str] = &[
        "stage",
        "team_a_id",
        "team_b_id",
        "winner_id",
        "avg_duration_min",
        "avg_kills_per_game",
    ];
    const SEARCH_COLUMN: &'static str = "stage";

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.stage.clone()),
            Value::from(self.team_a_id),
            Value::from(self.team_b_id),
            Value::from(self.winner_id),
            Value::Real(self.avg_duration_min),
            Value::Real(self.avg_kills_per_game),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            stage: row.get("stage")?,
            team_a_id: row.get("team_a_id")?,
            team_b_id: row.get("team_b_id")?,
            winner_id: row.get("winner_id")?,
            avg_duration_min: row.get("avg_duration_min")?,
            avg_kills_per_game: row.get("avg_kills_per_game")?,
            is_deleted: parse_flag(row, "match_summaries")?,
        })
    }
}

impl SqliteRepository<'_, MatchSummary> {
    /// Active matches won by `team_id`.
    ///
    /// # Errors
    /// - `NoMatches` when the team has no active wins on record.
    pub fn filter_by_winner(&self, team_id: EntityId) -> RepoResult<Vec<MatchSummary>> {
        self.filter_active(
            Predicate::all().eq("winner_id", team_id),
            &format!("winner_id={team_id}"),
            OnEmpty::NoMatches,
        )
    }

    /// Active matches where `team_id` played on either side.
    pub fn matches_for_team(&self, team_id: EntityId) -> RepoResult<Vec<MatchSummary>> {
        self.filter_active(
            Predicate::all().either_eq("team_a_id", "team_b_id", team_id),
            &format!("team_id={team_id}"),
            OnEmpty::ReturnEmpty,
        )
    }

    /// Records that `champion_id` was played in `match_id`.
    ///
    /// Returns `false` when the pair was already linked.
    ///
    /// # Errors
    /// - `NotFound` when either row is missing or soft-deleted.
    pub fn link_champion(&self, match_id: EntityId, champion_id: EntityId) -> RepoResult<bool> {
        let created = self
            .gateway()
            .transaction(EntityKind::MatchSummary, "link_champion", |gateway| {
                require_active::<MatchSummary>(gateway, match_id, "link_champion")?;
                require_active::<Champion>(gateway, champion_id, "link_champion")?;
                let changed = gateway.connection().execute(
                    "INSERT OR IGNORE INTO match_champion_links (match_id, champion_id)
                     VALUES (?1, ?2);",
                    params![match_id, champion_id],
                )?;
                Ok(changed == 1)
            })?;

        if created {
            info!(
                "event=link_create module=repo status=ok match_id={match_id} champion_id={champion_id}"
            );
        }
        Ok(created)
    }

    /// Removes the association between a match and a champion.
    ///
    /// Returns `false` when no such link existed.
    ///
    /// # Errors
    /// - `NotFound` when the match is missing or soft-deleted.
    pub fn unlink_champion(&self, match_id: EntityId, champion_id: EntityId) -> RepoResult<bool> {
        self.gateway()
            .transaction(EntityKind::MatchSummary, "unlink_champion", |gateway| {
                require_active::<MatchSummary>(gateway, match_id, "unlink_champion")?;
                let changed = gateway.connection().execute(
                    "DELETE FROM match_champion_links
                     WHERE match_id = ?1
                       AND champion_id = ?2;",
                    params![match_id, champion_id],
                )?;
                Ok(changed == 1)
            })
    }

    /// Active champions linked to an active match, id-ordered.
    ///
    /// # Errors
    /// - `NotFound` when the match is missing or soft-deleted.
    pub fn champions_for_match(&self, match_id: EntityId) -> RepoResult<Vec<Champion>> {
        require_active::<MatchSummary>(self.gateway(), match_id, "champions_for_match")?;
        self.gateway().query(
            &Predicate::active_only().member_of(
                "id",
                "SELECT champion_id FROM match_champion_links WHERE match_id = ?",
                match_id,
            ),
            None,
        )
    }

    /// Every link row of a match, regardless of either side's tombstone.
    pub fn links_for_match(&self, match_id: EntityId) -> RepoResult<Vec<MatchChampionLink>> {
        let mut stmt = self.gateway().connection().prepare(
            "SELECT match_id, champion_id
             FROM match_champion_links
             WHERE match_id = ?1
             ORDER BY champion_id ASC;",
        )?;
        let mut rows = stmt.query([match_id])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(MatchChampionLink {
                match_id: row.get("match_id")?,
                champion_id: row.get("champion_id")?,
            });
        }
        Ok(links)
    }
}
