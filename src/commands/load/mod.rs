//! `fll-scoring load` command - import a JSON tournament dump
//!
//! Everything goes through the store's raw-data helpers, so each imported
//! score stamps the tournament exactly as live score entry would. Loading
//! into an existing tournament adds to it and replaces matching rows.

mod model;

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};
use fll_scoring_core::category::CategoryRegistry;
use fll_scoring_core::db::{Database, Tournament};
use fll_scoring_core::error::{Result, ScoringError};

pub use model::{LoadCounts, TournamentDump};

/// Execute the load command
pub fn execute(
    cli: &Cli,
    db: &Database,
    file: &Path,
    registry: Option<&CategoryRegistry>,
) -> Result<()> {
    let content = fs::read_to_string(file).map_err(|e| ScoringError::ReadFile {
        path: file.to_path_buf(),
        reason: e.to_string(),
    })?;
    let dump: TournamentDump = serde_json::from_str(&content)?;

    let tournament = find_or_create(db, &dump)?;
    let counts = import(db, &tournament, &dump)?;
    tracing::info!(tournament = %tournament.name, ?counts, "Loaded tournament dump");

    let recomputed = match registry {
        Some(registry) => Some(db.summarize_and_aggregate(tournament.id, registry)?),
        None => None,
    };

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            None,
            &[
                ("tournament", json!(tournament)),
                ("loaded", json!(counts)),
                ("recompute", json!(recomputed)),
            ],
        ),
        human => {
            if !cli.quiet {
                println!(
                    "Loaded {} teams, {} judges, {} runs, {} subjective scores and {} goal scores into {}",
                    counts.teams,
                    counts.judges,
                    counts.performance,
                    counts.subjective,
                    counts.goals,
                    tournament.name
                );
                if let Some(summary) = &recomputed {
                    println!(
                        "Recomputed {} final and {} overall scores",
                        summary.final_scores.total(),
                        summary.overall_scores
                    );
                }
            }
        },
        records => {
            let id = tournament.id.to_string();
            let teams = counts.teams.to_string();
            let performance = counts.performance.to_string();
            let subjective = counts.subjective.to_string();
            let goals = counts.goals.to_string();
            print_records_header(
                "load",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("id", id.as_str()),
                    ("teams", teams.as_str()),
                    ("runs", performance.as_str()),
                    ("subjective", subjective.as_str()),
                    ("goals", goals.as_str()),
                    ("recomputed", if recomputed.is_some() { "true" } else { "false" }),
                ],
            );
        }
    )
}

fn find_or_create(db: &Database, dump: &TournamentDump) -> Result<Tournament> {
    match db.find_tournament(&dump.tournament.name) {
        Ok(tournament) => {
            if tournament.seeding_rounds != dump.tournament.seeding_rounds {
                tracing::warn!(
                    tournament = %tournament.name,
                    stored = tournament.seeding_rounds,
                    dump = dump.tournament.seeding_rounds,
                    "Keeping stored seeding rounds"
                );
            }
            Ok(tournament)
        }
        Err(ScoringError::TournamentNotFound(_)) => db.create_tournament(
            &dump.tournament.name,
            dump.tournament.description.as_deref(),
            dump.tournament.seeding_rounds,
        ),
        Err(e) => Err(e),
    }
}

fn import(db: &Database, tournament: &Tournament, dump: &TournamentDump) -> Result<LoadCounts> {
    let id = tournament.id;
    for team in &dump.teams {
        db.register_team(id, team)?;
    }
    for judge in &dump.judges {
        db.assign_judge(id, judge)?;
    }
    for run in &dump.performance {
        db.record_performance_score(id, run)?;
    }
    for score in &dump.subjective {
        db.record_subjective_score(id, score)?;
    }
    for goal in &dump.goals {
        db.record_goal_score(id, goal)?;
    }

    Ok(LoadCounts {
        teams: dump.teams.len(),
        judges: dump.judges.len(),
        performance: dump.performance.len(),
        subjective: dump.subjective.len(),
        goals: dump.goals.len(),
    })
}
