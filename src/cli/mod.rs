//! CLI argument parsing for fll-scoring
//!
//! Global flags: --db, --challenge, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod commands;
pub mod format;
pub mod output;

use clap::Parser;
use std::path::PathBuf;

pub use commands::Commands;
pub use output::{GroupingArg, OutputFormat};

/// fll-scoring - tournament score aggregation and ranking
#[derive(Parser, Debug)]
#[command(name = "fll-scoring")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the score database
    #[arg(long, global = true, env = "FLL_SCORING_DB", default_value = "fll-scoring.db")]
    pub db: PathBuf,

    /// Challenge description (TOML)
    #[arg(long, global = true, env = "FLL_SCORING_CHALLENGE")]
    pub challenge: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_parser = output::format_parser(), default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (e.g. debug, or a full filter directive)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
