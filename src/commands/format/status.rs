//! Status message formatting helpers

use serde_json::json;

use crate::cli::Cli;
use fll_scoring_core::db::{Database, Tournament};
use fll_scoring_core::error::Result;
use fll_scoring_core::records::record_value;

/// Print a JSON status message with optional fields
///
/// # Examples
/// ```ignore
/// print_json_status("ok", Some("Database ready"), &[("schema_version", json!(1))])?;
/// ```
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(obj) = output.as_object_mut() {
        if let Some(msg) = message {
            obj.insert("message".to_string(), json!(msg));
        }
        for (key, value) in extra_fields {
            obj.insert(key.to_string(), value.clone());
        }
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print a Records format header
///
/// # Examples
/// ```ignore
/// print_records_header("rank", &[("tournament", "Regional"), ("category", "overall")]);
/// ```
pub fn print_records_header(mode: &str, extra_fields: &[(&str, &str)]) {
    let mut parts = vec!["H fll=1 records=1".to_string(), format!("mode={}", mode)];

    for (key, value) in extra_fields {
        parts.push(format!("{}={}", key, record_value(value)));
    }

    println!("{}", parts.join(" "));
}

/// Warn on stderr when the tournament's derived scores are stale.
///
/// Returns the staleness so callers can include it in structured output.
pub fn warn_if_stale(cli: &Cli, db: &Database, tournament: &Tournament) -> Result<bool> {
    let stale = db.needs_recompute(tournament.id)?;
    if stale && !cli.quiet {
        eprintln!(
            "warning: scores for {} are out of date; run `fll-scoring recompute --tournament {}`",
            tournament.name,
            record_value(&tournament.name)
        );
    }
    Ok(stale)
}
