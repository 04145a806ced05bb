//! Bulk loader for tabular tournament data.
//!
//! # Responsibility
//! - Turn loosely typed rows (column name -> raw text) into drafts.
//! - Resolve team names to ids through an active-team cache.
//! - Create every accepted row through the entity repositories.
//!
//! # Invariants
//! - A rejected row is skipped and reported; it never aborts the load.
//!   Constraint violations (duplicate slug, name taken by a soft-deleted
//!   team) count as rejected rows.
//! - Any other storage failure aborts the load and propagates.
//! - Rows are never hard-deleted or overwritten.

use crate::model::champion::NewChampion;
use crate::model::match_summary::NewMatchSummary;
use crate::model::player::{NewPlayer, PlayerRole};
use crate::model::team::NewTeam;
use crate::model::{EntityId, EntityKind};
use crate::repo::champion_repo::ChampionRepository;
use crate::repo::gateway::{SqliteGateway, Table};
use crate::repo::match_repo::MatchSummaryRepository;
use crate::repo::player_repo::PlayerRepository;
use crate::repo::soft_delete::{SoftDeleteRepository, SqliteRepository};
use crate::repo::team_repo::TeamRepository;
use crate::repo::RepoResult;
use log::{info, warn};
use rusqlite::Connection;
use std::collections::{BTreeMap, HashMap};

/// One input row keyed by column header.
pub type SeedRow = BTreeMap<String, String>;

/// Row that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position in the input.
    pub index: usize,
    pub reason: String,
}

/// Outcome of one loader call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: Vec<SkippedRow>,
}

impl SeedReport {
    fn skip(&mut self, kind: EntityKind, index: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("event=seed_row_skipped module=seed status=skip kind={kind} row={index} reason={reason}");
        self.skipped.push(SkippedRow { index, reason });
    }
}

/// Parses an integer cell; blank or malformed text becomes 0.
pub fn parse_int_or_default(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

/// Parses a float cell; blank, malformed or non-finite text becomes 0.0.
pub fn parse_float_or_default(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Loader over one migrated connection.
pub struct SeedLoader<'conn> {
    champions: ChampionRepository<'conn>,
    teams: TeamRepository<'conn>,
    matches: MatchSummaryRepository<'conn>,
    players: PlayerRepository<'conn>,
    team_ids: HashMap<String, EntityId>,
}

impl<'conn> SeedLoader<'conn> {
    /// Builds the loader and primes the team cache from active teams.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let gateway = SqliteGateway::try_new(conn)?;
        let teams: TeamRepository<'conn> = SqliteRepository::from_gateway(gateway);
        let team_ids = teams.ids_by_name()?;
        Ok(Self {
            champions: SqliteRepository::from_gateway(gateway),
            teams,
            matches: SqliteRepository::from_gateway(gateway),
            players: SqliteRepository::from_gateway(gateway),
            team_ids,
        })
    }

    /// Columns: `name`, `region`, `wins`, `losses`, `avg_kda`,
    /// `favorite_champions`.
    pub fn load_teams(&mut self, rows: &[SeedRow]) -> RepoResult<SeedReport> {
        let mut report = SeedReport::default();
        for (index, row) in rows.iter().enumerate() {
            let (Some(name), Some(region)) = (text(row, "name"), text(row, "region")) else {
                report.skip(EntityKind::Team, index, "missing name or region");
                continue;
            };
            if self.team_ids.contains_key(name) {
                report.skip(EntityKind::Team, index, format!("duplicate team `{name}`"));
                continue;
            }

            let mut draft = NewTeam::new(name, region);
            draft.wins = parse_int_or_default(cell(row, "wins"));
            draft.losses = parse_int_or_default(cell(row, "losses"));
            draft.avg_kda = parse_float_or_default(cell(row, "avg_kda"));
            draft.favorite_champions = text(row, "favorite_champions").map(str::to_string);

            if let Some(team) = create_row(&self.teams, &draft, index, &mut report)? {
                self.team_ids.insert(team.name, team.id);
            }
        }
        Ok(finish(EntityKind::Team, report))
    }

    /// Columns: `nickname`, `role`, `real_name`, `country`, `team_name`,
    /// `kda`. A blank `team_name` loads a free agent.
    pub fn load_players(&mut self, rows: &[SeedRow]) -> RepoResult<SeedReport> {
        let mut report = SeedReport::default();
        for (index, row) in rows.iter().enumerate() {
            let (Some(nickname), Some(role_code)) = (text(row, "nickname"), text(row, "role"))
            else {
                report.skip(EntityKind::Player, index, "missing nickname or role");
                continue;
            };
            let role = match role_code.parse::<PlayerRole>() {
                Ok(role) => role,
                Err(err) => {
                    report.skip(EntityKind::Player, index, err.to_string());
                    continue;
                }
            };
            let team_id = match text(row, "team_name") {
                None => None,
                Some(team_name) => match self.team_ids.get(team_name) {
                    Some(id) => Some(*id),
                    None => {
                        report.skip(
                            EntityKind::Player,
                            index,
                            format!("unknown team `{team_name}`"),
                        );
                        continue;
                    }
                },
            };

            let mut draft = NewPlayer::new(nickname, role);
            draft.real_name = text(row, "real_name").map(str::to_string);
            draft.country = text(row, "country").map(str::to_string);
            draft.team_id = team_id;
            draft.kda = parse_float_or_default(cell(row, "kda"));

            create_row(&self.players, &draft, index, &mut report)?;
        }
        Ok(finish(EntityKind::Player, report))
    }

    /// Columns: `slug`, `name`, `pick_rate`, `ban_rate`, `win_rate`, `kda`.
    pub fn load_champions(&mut self, rows: &[SeedRow]) -> RepoResult<SeedReport> {
        let mut report = SeedReport::default();
        for (index, row) in rows.iter().enumerate() {
            let (Some(slug), Some(name)) = (text(row, "slug"), text(row, "name")) else {
                report.skip(EntityKind::Champion, index, "missing slug or name");
                continue;
            };

            let mut draft = NewChampion::new(slug, name);
            draft.pick_rate = parse_float_or_default(cell(row, "pick_rate"));
            draft.ban_rate = parse_float_or_default(cell(row, "ban_rate"));
            draft.win_rate = parse_float_or_default(cell(row, "win_rate"));
            draft.kda = parse_float_or_default(cell(row, "kda"));

            create_row(&self.champions, &draft, index, &mut report)?;
        }
        Ok(finish(EntityKind::Champion, report))
    }

    /// Columns: `stage`, `team_a`, `team_b`, `winner`, `avg_duration_min`,
    /// `avg_kills_per_game`. Team columns hold team names.
    pub fn load_matches(&mut self, rows: &[SeedRow]) -> RepoResult<SeedReport> {
        let mut report = SeedReport::default();
        for (index, row) in rows.iter().enumerate() {
            let Some(stage) = text(row, "stage") else {
                report.skip(EntityKind::MatchSummary, index, "missing stage");
                continue;
            };
            let resolved = self
                .required_team(row, "team_a")
                .and_then(|team_a| Ok((team_a, self.required_team(row, "team_b")?)))
                .and_then(|(team_a, team_b)| {
                    Ok((team_a, team_b, self.optional_team(row, "winner")?))
                });
            let (team_a_id, team_b_id, winner_id) = match resolved {
                Ok(ids) => ids,
                Err(reason) => {
                    report.skip(EntityKind::MatchSummary, index, reason);
                    continue;
                }
            };

            let mut draft = NewMatchSummary::new(stage);
            draft.team_a_id = Some(team_a_id);
            draft.team_b_id = Some(team_b_id);
            draft.winner_id = winner_id;
            draft.avg_duration_min = parse_float_or_default(cell(row, "avg_duration_min"));
            draft.avg_kills_per_game = parse_float_or_default(cell(row, "avg_kills_per_game"));

            create_row(&self.matches, &draft, index, &mut report)?;
        }
        Ok(finish(EntityKind::MatchSummary, report))
    }

    fn required_team(&self, row: &SeedRow, column: &str) -> Result<EntityId, String> {
        self.optional_team(row, column)?
            .ok_or_else(|| format!("missing {column}"))
    }

    fn optional_team(&self, row: &SeedRow, column: &str) -> Result<Option<EntityId>, String> {
        match text(row, column) {
            None => Ok(None),
            Some(name) => self
                .team_ids
                .get(name)
                .copied()
                .map(Some)
                .ok_or_else(|| format!("unknown {column} `{name}`")),
        }
    }
}

/// Creates one row; domain and constraint rejections become skips.
fn create_row<T: Table>(
    repo: &SqliteRepository<'_, T>,
    draft: &T::Draft,
    index: usize,
    report: &mut SeedReport,
) -> RepoResult<Option<T>> {
    match repo.create(draft) {
        Ok(record) => {
            report.created += 1;
            Ok(Some(record))
        }
        Err(err) if err.is_storage_failure() && !err.is_constraint_violation() => Err(err),
        Err(err) => {
            report.skip(T::KIND, index, err.to_string());
            Ok(None)
        }
    }
}

fn finish(kind: EntityKind, report: SeedReport) -> SeedReport {
    info!(
        "event=seed_complete module=seed status=ok kind={kind} created={} skipped={}",
        report.created,
        report.skipped.len()
    );
    report
}

fn cell<'a>(row: &'a SeedRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

/// Trimmed non-empty cell text.
fn text<'a>(row: &'a SeedRow, column: &str) -> Option<&'a str> {
    cell(row, column)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
