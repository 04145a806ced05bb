//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured store through `worlds_core`.
//! - Print the core version and active/deleted row counts per entity.

use log::error;
use std::process::ExitCode;
use worlds_core::{
    ChampionRepository, CoreConfig, MatchSummaryRepository, PlayerRepository, Record,
    RepoResult, SoftDeleteRepository, TeamRepository,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("worlds_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    config.init_logging()?;

    let conn = config.open_store().map_err(|err| err.to_string())?;
    println!("worlds_core version={}", worlds_core::core_version());

    let counts = || -> RepoResult<()> {
        print_counts(&ChampionRepository::try_new(&conn)?)?;
        print_counts(&TeamRepository::try_new(&conn)?)?;
        print_counts(&MatchSummaryRepository::try_new(&conn)?)?;
        print_counts(&PlayerRepository::try_new(&conn)?)
    };
    counts().map_err(|err| err.to_string())
}

fn print_counts<T: Record>(repo: &impl SoftDeleteRepository<T>) -> RepoResult<()> {
    let total = repo.count(true)?;
    let active = repo.count(false)?;
    println!(
        "{} active={active} deleted={}",
        T::KIND.table(),
        total - active
    );
    Ok(())
}
