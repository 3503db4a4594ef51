//! fll-scoring - tournament score aggregation and ranking CLI
//!
//! Loads raw performance and judged scores into a SQLite store, turns them
//! into final and overall scores, and reports competition ranks.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use fll_scoring_core::error::{ExitCode as ScoringExitCode, ScoringError};
use fll_scoring_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(ScoringExitCode::Success as u8),
        Err(e) => report_error(&e, cli.format, cli.quiet),
    }
}

fn report_error(err: &ScoringError, format: OutputFormat, quiet: bool) -> ExitCode {
    if format == OutputFormat::Json {
        eprintln!("{}", err.to_json());
    } else if !quiet {
        eprintln!("error: {}", err);
    }
    ExitCode::from(err.exit_code() as u8)
}

/// Argument errors happen before `--format` is known, so JSON callers are
/// recognised from the raw arguments. Help and version output always go
/// through clap.
fn report_parse_error(err: clap::Error) -> ExitCode {
    let informational = matches!(
        err.kind(),
        ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    );
    if informational || requested_format(env::args().skip(1)) != Some(OutputFormat::Json) {
        err.exit();
    }

    report_error(&scoring_error_from_clap(&err), OutputFormat::Json, false)
}

fn scoring_error_from_clap(err: &clap::Error) -> ScoringError {
    let message = err.to_string().trim_end().to_string();
    match err.kind() {
        ClapErrorKind::ValueValidation
        | ClapErrorKind::InvalidValue
        | ClapErrorKind::InvalidSubcommand
        | ClapErrorKind::UnknownArgument
        | ClapErrorKind::MissingRequiredArgument
        | ClapErrorKind::MissingSubcommand
        | ClapErrorKind::ArgumentConflict
        | ClapErrorKind::TooManyValues
        | ClapErrorKind::WrongNumberOfValues => ScoringError::UsageError(message),
        _ => ScoringError::Other(message),
    }
}

/// The last `--format` given, read without clap. Unknown values count as
/// no request.
fn requested_format<I>(args: I) -> Option<OutputFormat>
where
    I: IntoIterator<Item = String>,
{
    let mut requested = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let value = match arg.strip_prefix("--format") {
            Some("") => args.next(),
            Some(rest) => rest.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if let Some(format) = value.and_then(|v| v.parse::<OutputFormat>().ok()) {
            requested = Some(format);
        }
    }
    requested
}
