use std::fs;

use fll_scoring_core::category::CategoryRegistry;
use fll_scoring_core::db::{Database, PerformanceRun, SubjectiveScore, TournamentTeam};
use fll_scoring_core::error::{ExitCode, ScoringError};
use fll_scoring_core::ranking::{CategoryRank, Grouping, RankCategory};
use tempfile::tempdir;

const CHALLENGE: &str = r#"
title = "Integration Challenge"

[performance]
max_score = 500
weight = 2.0

[[subjective]]
name = "robot_design"
title = "Robot Design"
weight = 1.0

[[subjective.goals]]
name = "mechanical"
max = 25

[[subjective.goals]]
name = "programming"
max = 25
"#;

#[test]
fn test_challenge_file_round_trip_into_scores() {
    let dir = tempdir().unwrap();
    let challenge_path = dir.path().join("challenge.toml");
    fs::write(&challenge_path, CHALLENGE).unwrap();

    let registry = CategoryRegistry::load(&challenge_path).unwrap();
    assert_eq!(registry.title(), "Integration Challenge");
    assert_eq!(registry.max_score_range(), 500.0);
    assert_eq!(registry.require("robot_design").unwrap().title, "Robot Design");

    let db = Database::open(&dir.path().join("scores.db")).unwrap();
    let tournament = db.create_tournament("Qualifier", None, 2).unwrap();
    for number in [7, 8] {
        db.register_team(
            tournament.id,
            &TournamentTeam {
                team_number: number,
                team_name: format!("Team {}", number),
                organization: Some("School".to_string()),
                award_group: "Open".to_string(),
                judging_group: "Room 1".to_string(),
            },
        )
        .unwrap();
    }

    db.record_performance_score(
        tournament.id,
        &PerformanceRun {
            team_number: 7,
            run_number: 1,
            computed_total: Some(250.0),
            no_show: false,
            bye: false,
            verified: true,
        },
    )
    .unwrap();
    db.record_subjective_score(
        tournament.id,
        &SubjectiveScore {
            category: "robot_design".to_string(),
            team_number: 8,
            judge: "judge-1".to_string(),
            computed_total: Some(40.0),
            standardized_score: None,
            no_show: false,
        },
    )
    .unwrap();

    assert!(db.compute_if_needed(tournament.id, &registry).unwrap().is_some());

    // 250 * 2.0 against 40 / 50 * 500 * 1.0
    assert_eq!(db.get_overall_score(tournament.id, 7).unwrap(), 500.0);
    assert_eq!(db.get_overall_score(tournament.id, 8).unwrap(), 400.0);

    let rank = db
        .rank_team(
            tournament.id,
            7,
            &RankCategory::Overall,
            Grouping::AwardGroup,
            registry.winner_criteria(),
        )
        .unwrap();
    assert_eq!(
        rank,
        CategoryRank::Ranked {
            rank: 1,
            group_size: 2
        }
    );
}

#[test]
fn test_negative_weight_fails_before_store_access() {
    let dir = tempdir().unwrap();
    let challenge_path = dir.path().join("challenge.toml");
    fs::write(
        &challenge_path,
        CHALLENGE.replace("weight = 2.0", "weight = -2.0"),
    )
    .unwrap();

    let err = CategoryRegistry::load(&challenge_path).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidChallenge { .. }));
    assert_eq!(err.exit_code(), ExitCode::Usage);
}

#[test]
fn test_unparsable_weight_is_a_validation_error() {
    let dir = tempdir().unwrap();
    let challenge_path = dir.path().join("challenge.toml");
    fs::write(
        &challenge_path,
        CHALLENGE.replace("weight = 2.0", "weight = \"heavy\""),
    )
    .unwrap();

    let err = CategoryRegistry::load(&challenge_path).unwrap_err();
    assert!(matches!(err, ScoringError::Toml(_)));
    assert_eq!(err.exit_code(), ExitCode::Usage);
}

#[test]
fn test_missing_challenge_file() {
    let dir = tempdir().unwrap();
    let err = CategoryRegistry::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ScoringError::ReadFile { .. }));
}
