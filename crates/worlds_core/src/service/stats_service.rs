//! Cross-entity read models: team-name resolution and on-read aggregates.
//!
//! # Invariants
//! - Team names resolve from active teams only. A missing or soft-deleted
//!   team renders as a placeholder containing its raw id; it never fails
//!   the listing.
//! - Aggregates are recomputed from active rows on every call.

use crate::model::match_summary::MatchSummary;
use crate::model::player::Player;
use crate::model::team::Team;
use crate::model::EntityId;
use crate::repo::gateway::SqliteGateway;
use crate::repo::match_repo::MatchSummaryRepository;
use crate::repo::player_repo::PlayerRepository;
use crate::repo::soft_delete::{SoftDeleteRepository, SqliteRepository};
use crate::repo::team_repo::TeamRepository;
use crate::repo::{ListQuery, RepoResult};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

/// Match listing row with team ids resolved to display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummaryView {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub winner: Option<String>,
}

/// Player listing row with the team id resolved to a display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub player: Player,
    pub team: Option<String>,
}

/// Team record plus values derived from its current active dependents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    #[serde(flatten)]
    pub team: Team,
    pub win_rate: f64,
    /// Active matches where the team played either side.
    pub matches_played: usize,
    pub avg_match_duration_min: Option<f64>,
    /// Mean KDA over the team's active roster.
    pub avg_player_kda: Option<f64>,
}

/// Read service over teams, matches and players sharing one connection.
pub struct StatsService<'conn> {
    teams: TeamRepository<'conn>,
    matches: MatchSummaryRepository<'conn>,
    players: PlayerRepository<'conn>,
}

impl<'conn> StatsService<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let gateway = SqliteGateway::try_new(conn)?;
        Ok(Self {
            teams: SqliteRepository::from_gateway(gateway),
            matches: SqliteRepository::from_gateway(gateway),
            players: SqliteRepository::from_gateway(gateway),
        })
    }

    /// Lists matches like [`SoftDeleteRepository::list`] with team names.
    pub fn match_views(&self, query: &ListQuery) -> RepoResult<Vec<MatchSummaryView>> {
        let names = self.teams.names_by_id()?;
        let views = self
            .matches
            .list(query)?
            .into_iter()
            .map(|summary| MatchSummaryView {
                team_a: summary.team_a_id.map(|id| team_label(&names, id)),
                team_b: summary.team_b_id.map(|id| team_label(&names, id)),
                winner: summary.winner_id.map(|id| team_label(&names, id)),
                summary,
            })
            .collect();
        Ok(views)
    }

    /// Lists players like [`SoftDeleteRepository::list`] with team names.
    pub fn player_views(&self, query: &ListQuery) -> RepoResult<Vec<PlayerView>> {
        let names = self.teams.names_by_id()?;
        let views = self
            .players
            .list(query)?
            .into_iter()
            .map(|player| PlayerView {
                team: player.team_id.map(|id| team_label(&names, id)),
                player,
            })
            .collect();
        Ok(views)
    }

    /// Computes the standing of one active team.
    ///
    /// # Errors
    /// - `NotFound` when the team is missing or soft-deleted.
    pub fn team_standing(&self, team_id: EntityId) -> RepoResult<TeamStanding> {
        let team = self.teams.get(team_id)?;
        let matches = self.matches.matches_for_team(team_id)?;
        let roster = self.players.roster(team_id)?;

        Ok(TeamStanding {
            win_rate: team.win_rate(),
            matches_played: matches.len(),
            avg_match_duration_min: mean(matches.iter().map(|m| m.avg_duration_min)),
            avg_player_kda: mean(roster.iter().map(|player| player.kda)),
            team,
        })
    }
}

/// Display label for a team reference.
pub fn team_label(names: &HashMap<EntityId, String>, team_id: EntityId) -> String {
    names
        .get(&team_id)
        .cloned()
        .unwrap_or_else(|| format!("unknown team #{team_id}"))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
