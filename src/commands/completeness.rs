//! `fll-scoring completeness` command - judge progress per judging group

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};
use fll_scoring_core::category::CategoryRegistry;
use fll_scoring_core::db::{Database, JudgeSummary, Tournament};
use fll_scoring_core::error::Result;
use fll_scoring_core::records::record_value;

const UNASSIGNED: &str = "(no judge)";

/// Execute the completeness command
pub fn execute(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    registry: &CategoryRegistry,
) -> Result<()> {
    let summaries = db.judge_summaries(tournament.id, registry)?;
    let incomplete = summaries.iter().filter(|s| !s.is_complete()).count();

    output_by_format_result!(cli.format,
        json => {
            let entries: Vec<serde_json::Value> = summaries
                .iter()
                .map(|s| {
                    json!({
                        "judge": s.judge,
                        "category": s.category,
                        "group": s.group,
                        "expected": s.expected,
                        "actual": s.actual,
                        "complete": s.is_complete(),
                    })
                })
                .collect();
            print_json_status(
                if incomplete == 0 { "complete" } else { "incomplete" },
                None,
                &[
                    ("tournament", json!(tournament.name)),
                    ("incomplete", json!(incomplete)),
                    ("judges", json!(entries)),
                ],
            )
        },
        human => {
            print_human(&summaries, incomplete);
        },
        records => {
            let count = incomplete.to_string();
            print_records_header(
                "completeness",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("incomplete", count.as_str()),
                ],
            );
            for summary in &summaries {
                println!("{}", summary_record(summary));
            }
        }
    )
}

fn print_human(summaries: &[JudgeSummary], incomplete: usize) {
    if summaries.is_empty() {
        println!("No judging groups");
        return;
    }

    let mut current_group: Option<&str> = None;
    for summary in summaries {
        if current_group != Some(summary.group.as_str()) {
            println!("Judging group {}", summary.group);
            current_group = Some(summary.group.as_str());
        }
        let marker = if summary.is_complete() { " " } else { "!" };
        println!(
            "  {} {:<20} {:<16} {}/{}",
            marker,
            summary.category,
            summary.judge.as_deref().unwrap_or(UNASSIGNED),
            summary.actual,
            summary.expected
        );
    }

    if incomplete == 0 {
        println!("All judges complete");
    } else {
        println!("{} judge assignment(s) incomplete", incomplete);
    }
}

fn summary_record(summary: &JudgeSummary) -> String {
    let mut parts = vec![
        "J".to_string(),
        format!("group={}", record_value(&summary.group)),
        format!("category={}", record_value(&summary.category)),
    ];
    if let Some(judge) = &summary.judge {
        parts.push(format!("judge={}", record_value(judge)));
    }
    parts.push(format!("expected={}", summary.expected));
    parts.push(format!("actual={}", summary.actual));
    parts.push(format!("complete={}", summary.is_complete()));
    parts.join(" ")
}
