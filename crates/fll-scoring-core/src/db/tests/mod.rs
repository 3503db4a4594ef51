mod raw_scores;
mod recompute;

use crate::category::CategoryRegistry;
use crate::config::ChallengeConfig;
use crate::db::*;

/// Range 400: performance max 400, project 40, teamwork 10, core_values 30
pub(super) const CHALLENGE: &str = r#"
title = "Test Challenge"
winner_criteria = "high"
seeding_score = "max"

[performance]
max_score = 400
weight = 1.0

[[subjective]]
name = "project"
weight = 1.0
goals = [
  { name = "research", max = 20 },
  { name = "innovation", max = 20 },
]

[[subjective]]
name = "teamwork"
weight = 0.0
goals = [{ name = "communication", max = 10 }]

[[virtual_subjective]]
name = "core_values"
weight = 0.5
goal_refs = [
  { category = "project", goal = "innovation" },
  { category = "teamwork", goal = "communication" },
]
"#;

pub(super) fn registry_from(content: &str) -> CategoryRegistry {
    CategoryRegistry::from_config(&ChallengeConfig::parse(content).unwrap()).unwrap()
}

pub(super) fn registry() -> CategoryRegistry {
    registry_from(CHALLENGE)
}

pub(super) fn team(number: i32, award: &str, judging: &str) -> TournamentTeam {
    TournamentTeam {
        team_number: number,
        team_name: format!("Team {}", number),
        organization: None,
        award_group: award.to_string(),
        judging_group: judging.to_string(),
    }
}

/// Teams 101-103 in award group A / judging group J1, 104 in B / J2
pub(super) fn populate(db: &Database) -> Tournament {
    let tournament = db.create_tournament("Regional", None, 3).unwrap();
    for t in [
        team(101, "A", "J1"),
        team(102, "A", "J1"),
        team(103, "A", "J1"),
        team(104, "B", "J2"),
    ] {
        db.register_team(tournament.id, &t).unwrap();
    }
    tournament
}

pub(super) fn setup() -> (Database, Tournament) {
    let db = Database::open_in_memory().unwrap();
    let tournament = populate(&db);
    (db, tournament)
}

pub(super) fn perf(db: &Database, tournament: i64, team: i32, run: u32, total: f64) {
    db.record_performance_score(
        tournament,
        &PerformanceRun {
            team_number: team,
            run_number: run,
            computed_total: Some(total),
            no_show: false,
            bye: false,
            verified: true,
        },
    )
    .unwrap();
}

pub(super) fn subj(
    db: &Database,
    tournament: i64,
    category: &str,
    team: i32,
    judge: &str,
    total: Option<f64>,
) {
    db.record_subjective_score(
        tournament,
        &SubjectiveScore {
            category: category.to_string(),
            team_number: team,
            judge: judge.to_string(),
            computed_total: total,
            standardized_score: None,
            no_show: false,
        },
    )
    .unwrap();
}

pub(super) fn goal(
    db: &Database,
    tournament: i64,
    category: &str,
    team: i32,
    judge: &str,
    goal_name: &str,
    value: f64,
) {
    db.record_goal_score(
        tournament,
        &GoalScore {
            category: category.to_string(),
            team_number: team,
            judge: judge.to_string(),
            goal_name: goal_name.to_string(),
            goal_value: Some(value),
        },
    )
    .unwrap();
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// (category, team, score) rows of a derived table, ordered
pub(super) fn final_rows(db: &Database, tournament: i64) -> Vec<(String, i32, f64)> {
    let mut stmt = db
        .conn
        .prepare(
            "SELECT category, team_number, final_score FROM final_scores
             WHERE tournament = ?1 ORDER BY category, team_number",
        )
        .unwrap();
    let rows = stmt
        .query_map([tournament], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    rows
}

pub(super) fn overall_rows(db: &Database, tournament: i64) -> Vec<(i32, f64)> {
    let mut stmt = db
        .conn
        .prepare(
            "SELECT team_number, overall_score FROM overall_scores
             WHERE tournament = ?1 ORDER BY team_number",
        )
        .unwrap();
    let rows = stmt
        .query_map([tournament], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    rows
}
