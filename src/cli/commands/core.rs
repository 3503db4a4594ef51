//! Scoring command argument structures

use clap::Args;

use crate::cli::GroupingArg;

/// Selects a tournament by name or numeric id.
#[derive(Args, Debug, Clone)]
pub struct TournamentArgs {
    /// Tournament name or id
    #[arg(long, short)]
    pub tournament: String,
}

/// Arguments for the recompute command.
#[derive(Args, Debug)]
pub struct RecomputeArgs {
    #[command(flatten)]
    pub tournament: TournamentArgs,

    /// Only recompute when raw scores changed since the last recompute
    #[arg(long)]
    pub if_needed: bool,
}

/// Arguments for the scores command.
#[derive(Args, Debug)]
pub struct ScoresArgs {
    #[command(flatten)]
    pub tournament: TournamentArgs,

    /// Category to list (defaults to the overall score)
    #[arg(long, short)]
    pub category: Option<String>,
}

/// Arguments for the rank command.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub tournament: TournamentArgs,

    /// Category to rank; `overall` ranks the overall score
    #[arg(long, short)]
    pub category: String,

    /// Only report this team
    #[arg(long)]
    pub team: Option<i32>,

    /// Group to rank within (defaults to judging group for subjective
    /// categories, award group otherwise)
    #[arg(long, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Include quartiles
    #[arg(long)]
    pub quartiles: bool,
}
