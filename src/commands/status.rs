//! `fll-scoring status` command - modification stamps and staleness

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{
    output_by_format_result, print_json_status, print_records_header, warn_if_stale,
};
use fll_scoring_core::db::{Database, Tournament};
use fll_scoring_core::error::Result;

fn stamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
        .unwrap_or_else(|| "never".to_string())
}

/// Execute the status command
pub fn execute(cli: &Cli, db: &Database, tournament: &Tournament) -> Result<()> {
    let state = db.modification_state(tournament.id)?;
    let stale = warn_if_stale(cli, db, tournament)?;
    let teams = db.tournament_teams(tournament.id)?.len();

    let performance = stamp(state.performance_seeding_modified);
    let subjective = stamp(state.subjective_modified);
    let summary = stamp(state.summary_computed);

    output_by_format_result!(cli.format,
        json => print_json_status(
            if stale { "stale" } else { "ok" },
            None,
            &[
                ("tournament", json!(tournament)),
                ("teams", json!(teams)),
                ("modification_state", json!(state)),
                ("needs_recompute", json!(stale)),
            ],
        ),
        human => {
            println!("{} (id {})", tournament.name, tournament.id);
            if let Some(description) = &tournament.description {
                println!("  {}", description);
            }
            println!("  teams: {}", teams);
            println!("  seeding rounds: {}", tournament.seeding_rounds);
            println!("  performance modified: {}", performance);
            println!("  subjective modified:  {}", subjective);
            println!("  summary computed:     {}", summary);
            println!(
                "  scores: {}",
                if stale { "out of date" } else { "current" }
            );
        },
        records => {
            let id = tournament.id.to_string();
            let teams = teams.to_string();
            print_records_header(
                "status",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("id", id.as_str()),
                    ("teams", teams.as_str()),
                    ("performance_modified", performance.as_str()),
                    ("subjective_modified", subjective.as_str()),
                    ("summary_computed", summary.as_str()),
                    ("stale", if stale { "true" } else { "false" }),
                ],
            );
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_formatting() {
        assert_eq!(stamp(None), "never");
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(stamp(Some(t)), "2026-03-14T09:30:00.000000Z");
    }
}
