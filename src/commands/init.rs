//! `fll-scoring init` command - create or upgrade the score database
//!
//! Idempotent: opening the database creates missing tables and records the
//! schema version, so running it twice is harmless.

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};
use fll_scoring_core::db::Database;
use fll_scoring_core::error::Result;

/// Execute the init command
pub fn execute(cli: &Cli, db: &Database) -> Result<()> {
    let version = db.get_schema_version()?;
    let tournaments = db.list_tournaments()?;
    let path = cli.db.display().to_string();

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            Some("Database ready"),
            &[
                ("database", json!(path)),
                ("schema_version", json!(version)),
                ("tournaments", json!(tournaments)),
            ],
        ),
        human => {
            if !cli.quiet {
                println!("Initialized score database at {} (schema v{})", path, version);
                for tournament in &tournaments {
                    println!("  {} (id {})", tournament.name, tournament.id);
                }
            }
        },
        records => {
            let schema = version.to_string();
            let count = tournaments.len().to_string();
            print_records_header(
                "init",
                &[
                    ("database", path.as_str()),
                    ("schema", schema.as_str()),
                    ("tournaments", count.as_str()),
                    ("status", "ok"),
                ],
            );
        }
    )
}
