//! Core persistence and query layer for tournament statistics.
//! Every soft-delete and consistency rule lives in this crate.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::champion::{Champion, ChampionPatch, NewChampion};
pub use model::link::MatchChampionLink;
pub use model::match_summary::{MatchSummary, MatchSummaryPatch, NewMatchSummary};
pub use model::player::{NewPlayer, Player, PlayerPatch, PlayerRole};
pub use model::team::{NewTeam, Team, TeamPatch};
pub use model::{EntityId, EntityKind, Lifecycle, ModelValidationError, Record};
pub use repo::champion_repo::ChampionRepository;
pub use repo::match_repo::MatchSummaryRepository;
pub use repo::player_repo::PlayerRepository;
pub use repo::soft_delete::{SoftDeleteRepository, SqliteRepository, Transition};
pub use repo::team_repo::TeamRepository;
pub use repo::{ListQuery, RepoError, RepoResult};
pub use seed::{SeedLoader, SeedReport, SeedRow, SkippedRow};
pub use service::stats_service::{MatchSummaryView, PlayerView, StatsService, TeamStanding};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
