//! `fll-scoring recompute` command - rebuild final and overall scores

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};
use fll_scoring_core::category::CategoryRegistry;
use fll_scoring_core::db::{Database, RecomputeSummary, Tournament};
use fll_scoring_core::error::Result;

/// Execute the recompute command
///
/// With `if_needed` the store is left alone when the summary is current.
pub fn execute(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    registry: &CategoryRegistry,
    if_needed: bool,
) -> Result<()> {
    let summary = if if_needed {
        db.compute_if_needed(tournament.id, registry)?
    } else {
        Some(db.summarize_and_aggregate(tournament.id, registry)?)
    };

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            None,
            &[
                ("tournament", json!(tournament)),
                ("recomputed", json!(summary.is_some())),
                ("summary", json!(summary)),
            ],
        ),
        human => {
            if !cli.quiet {
                print_human(tournament, summary.as_ref());
            }
        },
        records => {
            let (performance, subjective, virtual_subjective, overall) = match &summary {
                Some(s) => (
                    s.final_scores.performance.to_string(),
                    s.final_scores.subjective.to_string(),
                    s.final_scores.virtual_subjective.to_string(),
                    s.overall_scores.to_string(),
                ),
                None => Default::default(),
            };
            let mut fields = vec![
                ("tournament", tournament.name.as_str()),
                ("recomputed", if summary.is_some() { "true" } else { "false" }),
            ];
            if summary.is_some() {
                fields.extend([
                    ("performance", performance.as_str()),
                    ("subjective", subjective.as_str()),
                    ("virtual", virtual_subjective.as_str()),
                    ("overall", overall.as_str()),
                ]);
            }
            print_records_header("recompute", &fields);
        }
    )
}

fn print_human(tournament: &Tournament, summary: Option<&RecomputeSummary>) {
    let Some(summary) = summary else {
        println!("Scores for {} are up to date", tournament.name);
        return;
    };

    println!("Recomputed scores for {}", tournament.name);
    println!(
        "  final scores: {} performance, {} subjective, {} virtual",
        summary.final_scores.performance,
        summary.final_scores.subjective,
        summary.final_scores.virtual_subjective
    );
    println!("  overall scores: {}", summary.overall_scores);
}
