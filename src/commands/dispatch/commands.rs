//! Command implementations for all fll-scoring commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use fll_scoring_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        dispatch_command::execute(self, ctx)
    }
}

pub(super) mod dispatch_command {
    use super::*;

    use crate::commands::dispatch::handlers;

    pub(super) fn execute(cmd: &Commands, ctx: &CommandContext) -> Result<()> {
        match cmd {
            Commands::Init => handlers::handle_init(ctx),
            Commands::Load(args) => handlers::handle_load(ctx, args),
            Commands::Recompute(args) => handlers::handle_recompute(ctx, args),
            Commands::Status(args) => handlers::handle_status(ctx, args),
            Commands::Scores(args) => handlers::handle_scores(ctx, args),
            Commands::Rank(args) => handlers::handle_rank(ctx, args),
            Commands::Completeness(args) => handlers::handle_completeness(ctx, args),
        }
    }
}
