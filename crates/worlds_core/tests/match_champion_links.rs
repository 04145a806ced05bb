use worlds_core::db::open_db_in_memory;
use worlds_core::{
    ChampionRepository, MatchChampionLink, MatchSummaryRepository, NewChampion, NewMatchSummary,
    RepoError, SoftDeleteRepository,
};

#[test]
fn linking_is_idempotent_and_reads_both_directions() {
    let conn = open_db_in_memory().unwrap();
    let champions = ChampionRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();

    let finals = matches.create(&NewMatchSummary::new("Finals")).unwrap();
    let semis = matches.create(&NewMatchSummary::new("Semifinals")).unwrap();
    let ahri = champions.create(&NewChampion::new("ahri", "Ahri")).unwrap();
    let rell = champions.create(&NewChampion::new("rell", "Rell")).unwrap();

    assert!(matches.link_champion(finals.id, ahri.id).unwrap());
    assert!(!matches.link_champion(finals.id, ahri.id).unwrap());
    assert!(matches.link_champion(finals.id, rell.id).unwrap());
    assert!(matches.link_champion(semis.id, ahri.id).unwrap());

    assert_eq!(
        matches.champions_for_match(finals.id).unwrap(),
        vec![ahri.clone(), rell.clone()]
    );
    assert_eq!(
        champions.matches_for_champion(ahri.id).unwrap(),
        vec![finals.clone(), semis.clone()]
    );
    assert_eq!(
        matches.links_for_match(finals.id).unwrap(),
        vec![
            MatchChampionLink {
                match_id: finals.id,
                champion_id: ahri.id
            },
            MatchChampionLink {
                match_id: finals.id,
                champion_id: rell.id
            },
        ]
    );
}

#[test]
fn link_reads_hide_soft_deleted_rows_but_keep_the_link() {
    let conn = open_db_in_memory().unwrap();
    let champions = ChampionRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();

    let finals = matches.create(&NewMatchSummary::new("Finals")).unwrap();
    let ahri = champions.create(&NewChampion::new("ahri", "Ahri")).unwrap();
    matches.link_champion(finals.id, ahri.id).unwrap();

    champions.soft_delete(ahri.id).unwrap();
    assert!(matches.champions_for_match(finals.id).unwrap().is_empty());
    assert_eq!(matches.links_for_match(finals.id).unwrap().len(), 1);

    champions.restore(ahri.id).unwrap();
    assert_eq!(
        matches.champions_for_match(finals.id).unwrap(),
        vec![ahri.clone()]
    );

    matches.soft_delete(finals.id).unwrap();
    assert!(champions.matches_for_champion(ahri.id).unwrap().is_empty());
    assert!(matches!(
        matches.champions_for_match(finals.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn linking_requires_active_rows_on_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let champions = ChampionRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();

    let finals = matches.create(&NewMatchSummary::new("Finals")).unwrap();
    let ahri = champions.create(&NewChampion::new("ahri", "Ahri")).unwrap();

    assert!(matches!(
        matches.link_champion(finals.id, 999).unwrap_err(),
        RepoError::NotFound {
            id: 999,
            operation: "link_champion",
            ..
        }
    ));

    champions.soft_delete(ahri.id).unwrap();
    assert!(matches!(
        matches.link_champion(finals.id, ahri.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
    assert!(matches.links_for_match(finals.id).unwrap().is_empty());
}

#[test]
fn unlink_reports_whether_a_link_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let champions = ChampionRepository::try_new(&conn).unwrap();
    let matches = MatchSummaryRepository::try_new(&conn).unwrap();

    let finals = matches.create(&NewMatchSummary::new("Finals")).unwrap();
    let ahri = champions.create(&NewChampion::new("ahri", "Ahri")).unwrap();
    matches.link_champion(finals.id, ahri.id).unwrap();

    assert!(matches.unlink_champion(finals.id, ahri.id).unwrap());
    assert!(!matches.unlink_champion(finals.id, ahri.id).unwrap());
    assert!(matches.champions_for_match(finals.id).unwrap().is_empty());
}
