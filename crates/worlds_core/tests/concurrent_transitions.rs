use std::sync::Barrier;
use std::thread;

use worlds_core::db::open_db;
use worlds_core::{NewTeam, RepoError, SoftDeleteRepository, TeamRepository, Transition};

const WRITERS: usize = 8;

#[test]
fn racing_soft_deletes_succeed_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("worlds.sqlite3");

    let team_id = {
        let conn = open_db(&path).unwrap();
        let teams = TeamRepository::try_new(&conn).unwrap();
        teams.create(&NewTeam::new("T1", "LCK")).unwrap().id
    };

    let barrier = Barrier::new(WRITERS);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                scope.spawn(|| {
                    let conn = open_db(&path).unwrap();
                    let teams = TeamRepository::try_new(&conn).unwrap();
                    barrier.wait();
                    teams.soft_delete(team_id)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let succeeded = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(succeeded, 1, "results: {results:?}");
    for result in results.into_iter().filter(Result::is_err) {
        let err = result.unwrap_err();
        assert!(
            matches!(
                err,
                RepoError::InvalidState {
                    transition: Transition::Delete,
                    ..
                }
            ),
            "unexpected error: {err}"
        );
    }

    let conn = open_db(&path).unwrap();
    let teams = TeamRepository::try_new(&conn).unwrap();
    let deleted = teams.list_deleted().unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, team_id);
    assert_eq!(teams.count(false).unwrap(), 0);
}
