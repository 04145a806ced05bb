use worlds_core::db::open_db_in_memory;
use worlds_core::{
    Champion, ChampionPatch, ChampionRepository, EntityKind, ListQuery, MatchSummaryRepository,
    ModelValidationError, NewChampion, NewMatchSummary, NewPlayer, NewTeam, PlayerRepository,
    PlayerRole, RepoError, SoftDeleteRepository, TeamPatch, TeamRepository, Transition,
};

#[test]
fn champion_delete_and_restore_follow_the_state_machine() {
    let conn = open_db_in_memory().unwrap();
    let repo = ChampionRepository::try_new(&conn).unwrap();

    let ahri = repo.create(&NewChampion::new("ahri", "Ahri")).unwrap();
    assert!(ahri.id > 0);
    assert!(!ahri.is_deleted);

    let err = repo.restore(ahri.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidState {
            kind: EntityKind::Champion,
            transition: Transition::Restore,
            ..
        }
    ));

    repo.soft_delete(ahri.id).unwrap();
    assert!(matches!(
        repo.get(ahri.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
    assert!(repo.list(&ListQuery::default()).unwrap().is_empty());
    let tombstoned = Champion {
        is_deleted: true,
        ..ahri.clone()
    };
    assert_eq!(repo.list_deleted().unwrap(), vec![tombstoned]);

    let err = repo.soft_delete(ahri.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidState {
            transition: Transition::Delete,
            ..
        }
    ));

    repo.restore(ahri.id).unwrap();
    assert_eq!(repo.get(ahri.id).unwrap(), ahri);
    assert!(repo.list_deleted().unwrap().is_empty());
}

#[test]
fn missing_ids_are_not_found_for_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let repo = TeamRepository::try_new(&conn).unwrap();

    for (err, expected_operation) in [
        (repo.get(404).unwrap_err(), "get"),
        (repo.soft_delete(404).unwrap_err(), "delete"),
        (repo.restore(404).unwrap_err(), "restore"),
        (repo.update(404, &TeamPatch::default()).unwrap_err(), "update"),
    ] {
        match err {
            RepoError::NotFound {
                kind: EntityKind::Team,
                id: 404,
                operation,
            } => assert_eq!(operation, expected_operation),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn update_on_deleted_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = TeamRepository::try_new(&conn).unwrap();
    let team = repo.create(&NewTeam::new("T1", "LCK")).unwrap();
    repo.soft_delete(team.id).unwrap();

    let patch = TeamPatch {
        wins: Some(10),
        ..TeamPatch::default()
    };
    assert!(matches!(
        repo.update(team.id, &patch).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn every_entity_supports_the_same_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();
    let players = PlayerRepository::try_new(&conn).unwrap();

    let team = teams.create(&NewTeam::new("Gen.G", "LCK")).unwrap();
    let summary = matches.create(&NewMatchSummary::new("Swiss R1")).unwrap();
    let player = players
        .create(&NewPlayer::new("Chovy", PlayerRole::Mid))
        .unwrap();

    teams.soft_delete(team.id).unwrap();
    matches.soft_delete(summary.id).unwrap();
    players.soft_delete(player.id).unwrap();

    assert_eq!(teams.count(false).unwrap(), 0);
    assert_eq!(matches.count(false).unwrap(), 0);
    assert_eq!(players.count(false).unwrap(), 0);
    assert_eq!(teams.count(true).unwrap(), 1);
    assert_eq!(matches.list_deleted().unwrap().len(), 1);
    assert_eq!(players.list_deleted().unwrap()[0].nickname, "Chovy");

    teams.restore(team.id).unwrap();
    matches.restore(summary.id).unwrap();
    players.restore(player.id).unwrap();

    assert_eq!(teams.get(team.id).unwrap().name, "Gen.G");
    assert_eq!(matches.get(summary.id).unwrap().stage, "Swiss R1");
    assert_eq!(players.get(player.id).unwrap().role, PlayerRole::Mid);
}

#[test]
fn update_merges_fields_and_never_touches_identity_or_tombstone() {
    let conn = open_db_in_memory().unwrap();
    let repo = ChampionRepository::try_new(&conn).unwrap();
    let ahri = repo.create(&NewChampion::new("ahri", "Ahri")).unwrap();

    let patch: ChampionPatch = serde_json::from_value(serde_json::json!({
        "id": 999,
        "is_deleted": true,
        "win_rate": 0.61
    }))
    .unwrap();
    let updated = repo.update(ahri.id, &patch).unwrap();

    assert_eq!(updated.id, ahri.id);
    assert!(!updated.is_deleted);
    assert_eq!(updated.win_rate, 0.61);
    assert_eq!(updated.slug, "ahri");

    let stored = repo.get(ahri.id).unwrap();
    assert_eq!(stored, updated);
    assert_eq!(repo.count(true).unwrap(), 1);
}

#[test]
fn nullable_fields_can_be_cleared_by_patch() {
    let conn = open_db_in_memory().unwrap();
    let repo = TeamRepository::try_new(&conn).unwrap();
    let mut draft = NewTeam::new("BLG", "LPL");
    draft.favorite_champions = Some("Kalista, Rell".to_string());
    let team = repo.create(&draft).unwrap();

    let keep: TeamPatch = serde_json::from_str(r#"{"wins": 3}"#).unwrap();
    let kept = repo.update(team.id, &keep).unwrap();
    assert_eq!(kept.favorite_champions.as_deref(), Some("Kalista, Rell"));

    let clear: TeamPatch = serde_json::from_str(r#"{"favorite_champions": null}"#).unwrap();
    let cleared = repo.update(team.id, &clear).unwrap();
    assert_eq!(cleared.favorite_champions, None);
    assert_eq!(cleared.wins, 3);
}

#[test]
fn invalid_drafts_and_patches_are_rejected_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let repo = TeamRepository::try_new(&conn).unwrap();

    let err = repo.create(&NewTeam::new("   ", "LCK")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::BlankField("name"))
    ));
    assert_eq!(repo.count(true).unwrap(), 0);

    let team = repo.create(&NewTeam::new("HLE", "LCK")).unwrap();
    let patch = TeamPatch {
        losses: Some(-2),
        ..TeamPatch::default()
    };
    let err = repo.update(team.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::NegativeValue("losses"))
    ));
    assert_eq!(repo.get(team.id).unwrap().losses, 0);
}

#[test]
fn duplicate_unique_column_is_a_storage_failure() {
    let conn = open_db_in_memory().unwrap();
    let repo = ChampionRepository::try_new(&conn).unwrap();
    repo.create(&NewChampion::new("azir", "Azir")).unwrap();

    let err = repo.create(&NewChampion::new("azir", "Azir again")).unwrap_err();
    assert!(err.is_storage_failure());
    assert!(err.is_constraint_violation());
    assert_eq!(repo.count(true).unwrap(), 1);
}

#[test]
fn ids_are_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = TeamRepository::try_new(&conn).unwrap();

    let first = repo.create(&NewTeam::new("FNC", "LEC")).unwrap();
    repo.soft_delete(first.id).unwrap();
    let second = repo.create(&NewTeam::new("G2", "LEC")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn serialized_records_hide_the_tombstone() {
    let conn = open_db_in_memory().unwrap();
    let repo = ChampionRepository::try_new(&conn).unwrap();
    let ahri = repo.create(&NewChampion::new("ahri", "Ahri")).unwrap();

    let json = serde_json::to_value(&ahri).unwrap();
    assert_eq!(json["id"], ahri.id);
    assert_eq!(json["slug"], "ahri");
    assert!(json.get("is_deleted").is_none());
}
