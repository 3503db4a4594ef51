//! Main CLI commands enum

use clap::Subcommand;

pub mod core;
pub mod data;

use core::*;
use data::*;

/// Top-level fll-scoring commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or upgrade the score database
    Init,

    /// Import a JSON tournament dump (teams, judges and raw scores)
    Load(LoadArgs),

    /// Recompute final and overall scores of a tournament
    Recompute(RecomputeArgs),

    /// Show modification stamps and whether scores are stale
    Status(TournamentArgs),

    /// List final scores of a category, or overall scores
    Scores(ScoresArgs),

    /// Rank teams within their award or judging group
    Rank(RankArgs),

    /// Report how many teams each judge has scored
    Completeness(TournamentArgs),
}
