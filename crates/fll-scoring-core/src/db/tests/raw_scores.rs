use super::*;
use crate::error::ScoringError;

#[test]
fn test_unregistered_team_is_rejected() {
    let (db, t) = setup();
    let err = db
        .record_performance_score(
            t.id,
            &PerformanceRun {
                team_number: 999,
                run_number: 1,
                computed_total: Some(10.0),
                no_show: false,
                bye: false,
                verified: false,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ScoringError::TeamNotFound { team: 999, .. }));
    // nothing was stamped
    assert!(db
        .modification_state(t.id)
        .unwrap()
        .performance_seeding_modified
        .is_none());
}

#[test]
fn test_non_finite_total_is_rejected() {
    let (db, t) = setup();
    let err = db
        .record_subjective_score(
            t.id,
            &SubjectiveScore {
                category: "project".to_string(),
                team_number: 101,
                judge: "alice".to_string(),
                computed_total: Some(f64::INFINITY),
                standardized_score: None,
                no_show: false,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidValue { .. }));
}

#[test]
fn test_delete_subjective_score() {
    let (db, t) = setup();
    subj(&db, t.id, "project", 101, "alice", Some(30.0));
    goal(&db, t.id, "project", 101, "alice", "innovation", 5.0);
    db.summarize_and_aggregate(t.id, &registry()).unwrap();

    assert!(db
        .delete_subjective_score(t.id, "project", 101, "alice")
        .unwrap());
    assert!(db.needs_recompute(t.id).unwrap());

    db.summarize_and_aggregate(t.id, &registry()).unwrap();
    assert!(!db
        .delete_subjective_score(t.id, "project", 101, "alice")
        .unwrap());
    assert!(!db.needs_recompute(t.id).unwrap());
}

#[test]
fn test_rerecorded_run_replaces_previous() {
    let (db, t) = setup();
    perf(&db, t.id, 101, 1, 100.0);
    perf(&db, t.id, 101, 1, 50.0);
    db.summarize_and_aggregate(t.id, &registry()).unwrap();

    assert_close(
        db.get_final_score(t.id, 101, "performance").unwrap().unwrap(),
        50.0,
    );
}

#[test]
fn test_tournament_lookup() {
    let (db, t) = setup();
    assert_eq!(db.find_tournament("Regional").unwrap(), t);
    assert_eq!(db.find_tournament(&t.id.to_string()).unwrap(), t);
    assert!(matches!(
        db.find_tournament("Nationals"),
        Err(ScoringError::TournamentNotFound(_))
    ));
    assert!(matches!(
        db.create_tournament("Regional", None, 3),
        Err(ScoringError::AlreadyExists { .. })
    ));
    assert!(db.create_tournament("2024", None, 3).is_err());
}

#[test]
fn test_reregistering_moves_team_between_groups() {
    let (db, t) = setup();
    db.register_team(t.id, &team(101, "B", "J2")).unwrap();

    let registration = db.team_registration(t.id, 101).unwrap();
    assert_eq!(registration.award_group, "B");
    assert_eq!(db.tournament_teams(t.id).unwrap().len(), 4);
}
