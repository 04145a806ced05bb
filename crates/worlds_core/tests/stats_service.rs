use worlds_core::db::open_db_in_memory;
use worlds_core::{
    ListQuery, MatchSummaryRepository, NewMatchSummary, NewPlayer, NewTeam, PlayerRepository,
    PlayerRole, RepoError, SoftDeleteRepository, StatsService, TeamRepository,
};

#[test]
fn match_views_resolve_team_names_with_placeholder_for_deleted_teams() {
    let conn = open_db_in_memory().unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();

    let t1 = teams.create(&NewTeam::new("T1", "LCK")).unwrap();
    let blg = teams.create(&NewTeam::new("BLG", "LPL")).unwrap();
    let mut finals = NewMatchSummary::new("Finals");
    finals.team_a_id = Some(t1.id);
    finals.team_b_id = Some(blg.id);
    finals.winner_id = Some(t1.id);
    matches.create(&finals).unwrap();
    matches.create(&NewMatchSummary::new("Showmatch")).unwrap();

    teams.soft_delete(blg.id).unwrap();

    let service = StatsService::try_new(&conn).unwrap();
    let views = service.match_views(&ListQuery::default()).unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].team_a.as_deref(), Some("T1"));
    assert_eq!(
        views[0].team_b,
        Some(format!("unknown team #{}", blg.id))
    );
    assert_eq!(views[0].winner.as_deref(), Some("T1"));
    assert_eq!(views[1].team_a, None);
    assert_eq!(views[1].winner, None);

    let json = serde_json::to_value(&views[0]).unwrap();
    assert_eq!(json["stage"], "Finals");
    assert_eq!(json["team_a"], "T1");
    assert_eq!(json["team_a_id"], t1.id);
    assert!(json.get("is_deleted").is_none());
}

#[test]
fn player_views_resolve_team_names() {
    let conn = open_db_in_memory().unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let players = PlayerRepository::try_new(&conn).unwrap();

    let geng = teams.create(&NewTeam::new("Gen.G", "LCK")).unwrap();
    let mut chovy = NewPlayer::new("Chovy", PlayerRole::Mid);
    chovy.team_id = Some(geng.id);
    players.create(&chovy).unwrap();
    players
        .create(&NewPlayer::new("Free Agent", PlayerRole::Top))
        .unwrap();

    let service = StatsService::try_new(&conn).unwrap();
    let views = service.player_views(&ListQuery::default()).unwrap();
    assert_eq!(views[0].team.as_deref(), Some("Gen.G"));
    assert_eq!(views[1].team, None);
}

#[test]
fn team_standing_aggregates_active_rows_only() {
    let conn = open_db_in_memory().unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();
    let players = PlayerRepository::try_new(&conn).unwrap();

    let mut hle = NewTeam::new("HLE", "LCK");
    hle.wins = 7;
    hle.losses = 3;
    let hle = teams.create(&hle).unwrap();
    let tes = teams.create(&NewTeam::new("TES", "LPL")).unwrap();

    for (stage, duration) in [("Swiss R1", 30.0), ("Swiss R2", 34.0), ("Swiss R3", 50.0)] {
        let mut draft = NewMatchSummary::new(stage);
        draft.team_a_id = Some(tes.id);
        draft.team_b_id = Some(hle.id);
        draft.avg_duration_min = duration;
        matches.create(&draft).unwrap();
    }
    let last = matches.search("R3").unwrap().remove(0);
    matches.soft_delete(last.id).unwrap();

    for (nickname, kda) in [("Zeus", 3.0), ("Peanut", 5.0)] {
        let mut draft = NewPlayer::new(nickname, PlayerRole::Top);
        draft.team_id = Some(hle.id);
        draft.kda = kda;
        players.create(&draft).unwrap();
    }

    let service = StatsService::try_new(&conn).unwrap();
    let standing = service.team_standing(hle.id).unwrap();
    assert_eq!(standing.team.name, "HLE");
    assert_eq!(standing.win_rate, 70.0);
    assert_eq!(standing.matches_played, 2);
    assert_eq!(standing.avg_match_duration_min, Some(32.0));
    assert_eq!(standing.avg_player_kda, Some(4.0));

    let empty = service.team_standing(tes.id).unwrap();
    assert_eq!(empty.win_rate, 0.0);
    assert_eq!(empty.avg_player_kda, None);
}

#[test]
fn team_standing_of_deleted_team_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let fnc = teams.create(&NewTeam::new("FNC", "LEC")).unwrap();
    teams.soft_delete(fnc.id).unwrap();

    let service = StatsService::try_new(&conn).unwrap();
    assert!(matches!(
        service.team_standing(fnc.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}
