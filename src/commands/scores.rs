//! `fll-scoring scores` command - list final or overall scores

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{
    output_by_format_result, print_json_status, print_records_header, warn_if_stale,
};
use fll_scoring_core::category::OVERALL_CATEGORY;
use fll_scoring_core::db::{Database, TeamScoreRow, Tournament};
use fll_scoring_core::error::Result;
use fll_scoring_core::format::format_score;
use fll_scoring_core::records::record_value;

/// Execute the scores command
///
/// `category` of `None` lists overall scores.
pub fn execute(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    category: Option<&str>,
) -> Result<()> {
    let stale = warn_if_stale(cli, db, tournament)?;
    let rows = match category {
        Some(category) => db.final_scores(tournament.id, category)?,
        None => db.overall_scores(tournament.id)?,
    };
    let label = category.unwrap_or(OVERALL_CATEGORY);

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            None,
            &[
                ("tournament", json!(tournament.name)),
                ("category", json!(label)),
                ("stale", json!(stale)),
                ("scores", json!(rows)),
            ],
        ),
        human => {
            print_human(&rows, label);
        },
        records => {
            print_records_header(
                "scores",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("category", label),
                    ("stale", if stale { "true" } else { "false" }),
                ],
            );
            for row in &rows {
                println!("{}", score_record(row));
            }
        }
    )
}

fn display_score(score: Option<f64>) -> String {
    score.map(format_score).unwrap_or_else(|| "-".to_string())
}

fn print_human(rows: &[TeamScoreRow], label: &str) {
    if rows.is_empty() {
        println!("No registered teams");
        return;
    }

    println!(
        "{:>6}  {:<28} {:<12} {:<12} {:>10}",
        "Team", "Name", "Award", "Judging", label
    );
    for row in rows {
        println!(
            "{:>6}  {:<28} {:<12} {:<12} {:>10}",
            row.team_number,
            row.team_name,
            row.award_group,
            row.judging_group,
            display_score(row.score)
        );
    }
}

fn score_record(row: &TeamScoreRow) -> String {
    format!(
        "S team={} name={} award_group={} judging_group={} score={}",
        row.team_number,
        record_value(&row.team_name),
        record_value(&row.award_group),
        record_value(&row.judging_group),
        display_score(row.score)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_record_quotes_names() {
        let row = TeamScoreRow {
            team_number: 42,
            team_name: "Lego Lions".to_string(),
            award_group: "A".to_string(),
            judging_group: "J1".to_string(),
            score: Some(187.5),
        };
        assert_eq!(
            score_record(&row),
            "S team=42 name=\"Lego Lions\" award_group=A judging_group=J1 score=187.50"
        );
    }

    #[test]
    fn test_missing_score_shows_dash() {
        assert_eq!(display_score(None), "-");
    }
}
