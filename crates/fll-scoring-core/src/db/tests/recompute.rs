use super::*;
use crate::error::{ErrorKind, ScoringError};
use std::thread;
use tempfile::tempdir;

fn record_sample_scores(db: &Database, tournament: i64) {
    perf(db, tournament, 101, 1, 210.0);
    perf(db, tournament, 102, 1, 180.0);
    perf(db, tournament, 103, 2, 180.0);
    subj(db, tournament, "project", 101, "alice", Some(30.0));
    subj(db, tournament, "project", 102, "alice", Some(34.0));
    goal(db, tournament, "project", 101, "alice", "innovation", 12.0);
    goal(db, tournament, "teamwork", 102, "carol", "communication", 7.0);
}

#[test]
fn test_recompute_is_idempotent() {
    let (db, t) = setup();
    record_sample_scores(&db, t.id);
    let registry = registry();

    let first = db.summarize_and_aggregate(t.id, &registry).unwrap();
    let finals = final_rows(&db, t.id);
    let overall = overall_rows(&db, t.id);

    let second = db.summarize_and_aggregate(t.id, &registry).unwrap();
    assert_eq!(final_rows(&db, t.id), finals);
    assert_eq!(overall_rows(&db, t.id), overall);
    assert_eq!(first.final_scores, second.final_scores);
    assert_eq!(second.overall_scores, 4);
}

#[test]
fn test_recompute_reports_rows_written() {
    let (db, t) = setup();
    record_sample_scores(&db, t.id);

    let summary = db.summarize_and_aggregate(t.id, &registry()).unwrap();
    assert_eq!(summary.tournament, t.id);
    assert_eq!(summary.final_scores.performance, 3);
    assert_eq!(summary.final_scores.subjective, 2);
    assert_eq!(summary.final_scores.virtual_subjective, 2);
    assert!(summary.summary_computed.is_some());
}

#[test]
fn test_staleness_follows_raw_writes() {
    let (db, t) = setup();
    let registry = registry();
    assert!(db.needs_recompute(t.id).unwrap());

    db.summarize_and_aggregate(t.id, &registry).unwrap();
    assert!(!db.needs_recompute(t.id).unwrap());

    subj(&db, t.id, "project", 101, "alice", Some(30.0));
    assert!(db.needs_recompute(t.id).unwrap());

    db.summarize_and_aggregate(t.id, &registry).unwrap();
    assert!(!db.needs_recompute(t.id).unwrap());

    // runs past the seeding rounds do not feed final scores
    perf(&db, t.id, 101, 5, 300.0);
    assert!(!db.needs_recompute(t.id).unwrap());

    perf(&db, t.id, 101, 1, 300.0);
    assert!(db.needs_recompute(t.id).unwrap());
}

#[test]
fn test_stamps_strictly_increase() {
    let (db, t) = setup();
    db.mark_performance_modified(t.id).unwrap();
    db.mark_subjective_modified(t.id).unwrap();
    db.mark_summary_computed(t.id).unwrap();

    let state = db.modification_state(t.id).unwrap();
    let perf = state.performance_seeding_modified.unwrap();
    let subj = state.subjective_modified.unwrap();
    let summary = state.summary_computed.unwrap();
    assert!(perf < subj);
    assert!(subj < summary);
    assert!(!state.needs_recompute());

    db.mark_performance_modified(t.id).unwrap();
    assert!(db.needs_recompute(t.id).unwrap());
}

#[test]
fn test_compute_if_needed_skips_fresh_summary() {
    let (db, t) = setup();
    record_sample_scores(&db, t.id);
    let registry = registry();

    let first = db.compute_if_needed(t.id, &registry).unwrap().unwrap();
    assert_eq!(first.overall_scores, 4);
    assert!(db.compute_if_needed(t.id, &registry).unwrap().is_none());

    subj(&db, t.id, "project", 103, "alice", Some(10.0));
    let again = db.compute_if_needed(t.id, &registry).unwrap().unwrap();
    assert!(again.summary_computed > first.summary_computed);
}

#[test]
fn test_failed_recompute_leaves_committed_state() {
    let (db, t) = setup();
    record_sample_scores(&db, t.id);
    let registry = registry();
    db.summarize_and_aggregate(t.id, &registry).unwrap();

    let finals = final_rows(&db, t.id);
    let overall = overall_rows(&db, t.id);
    let summary = db.modification_state(t.id).unwrap().summary_computed;

    subj(&db, t.id, "project", 103, "alice", Some(40.0));
    db.conn
        .execute_batch(
            "CREATE TRIGGER fail_overall BEFORE INSERT ON overall_scores
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .unwrap();

    let err = db.summarize_and_aggregate(t.id, &registry).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);

    assert_eq!(final_rows(&db, t.id), finals);
    assert_eq!(overall_rows(&db, t.id), overall);
    assert_eq!(db.modification_state(t.id).unwrap().summary_computed, summary);
    assert!(db.needs_recompute(t.id).unwrap());

    db.conn.execute_batch("DROP TRIGGER fail_overall").unwrap();
    db.summarize_and_aggregate(t.id, &registry).unwrap();
    assert!(db.get_final_score(t.id, 103, "project").unwrap().is_some());
}

#[test]
fn test_recompute_unknown_tournament() {
    let (db, _) = setup();
    let err = db.summarize_and_aggregate(999, &registry()).unwrap_err();
    assert!(matches!(err, ScoringError::TournamentNotFound(_)));
}

#[test]
fn test_concurrent_recomputes_leave_one_row_per_team() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.db");

    let tournament = {
        let db = Database::open(&path).unwrap();
        let t = populate(&db);
        record_sample_scores(&db, t.id);
        t.id
    };

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let db = Database::open(&path).unwrap();
                let registry = registry();
                for _ in 0..3 {
                    db.summarize_and_aggregate(tournament, &registry).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let db = Database::open(&path).unwrap();
    let overall = overall_rows(&db, tournament);
    assert_eq!(overall.len(), 4);
    assert_eq!(final_rows(&db, tournament).len(), 7);
    assert!(!db.needs_recompute(tournament).unwrap());
}
