//! Handlers that open the store, resolve arguments and run a command

use fll_scoring_core::category::OVERALL_CATEGORY;
use fll_scoring_core::error::Result;
use fll_scoring_core::ranking::{Grouping, RankCategory};

use crate::cli::commands::core::{RankArgs, RecomputeArgs, ScoresArgs, TournamentArgs};
use crate::cli::commands::data::LoadArgs;
use crate::commands;
use crate::commands::rank::RankOptions;

use super::command::CommandContext;
use super::macros::trace_command;

pub(super) fn handle_init(ctx: &CommandContext) -> Result<()> {
    let db = ctx.open_database()?;
    trace_command!(ctx.cli, ctx.start, "open_database");
    commands::init::execute(ctx.cli, &db)
}

pub(super) fn handle_load(ctx: &CommandContext, args: &LoadArgs) -> Result<()> {
    // validate the challenge before touching the store
    let registry = if args.recompute {
        Some(ctx.load_registry()?)
    } else {
        None
    };

    let db = ctx.open_database()?;
    trace_command!(ctx.cli, ctx.start, "open_database");
    commands::load::execute(ctx.cli, &db, &args.file, registry.as_ref())?;
    trace_command!(ctx.cli, ctx.start, "execute_command");
    Ok(())
}

pub(super) fn handle_recompute(ctx: &CommandContext, args: &RecomputeArgs) -> Result<()> {
    let registry = ctx.load_registry()?;
    let db = ctx.open_database()?;
    let tournament = ctx.resolve_tournament(&db, &args.tournament.tournament)?;
    trace_command!(ctx.cli, ctx.start, "resolve_tournament");

    commands::recompute::execute(ctx.cli, &db, &tournament, &registry, args.if_needed)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");
    Ok(())
}

pub(super) fn handle_status(ctx: &CommandContext, args: &TournamentArgs) -> Result<()> {
    let db = ctx.open_database()?;
    let tournament = ctx.resolve_tournament(&db, &args.tournament)?;
    commands::status::execute(ctx.cli, &db, &tournament)
}

pub(super) fn handle_scores(ctx: &CommandContext, args: &ScoresArgs) -> Result<()> {
    let category = match args.category.as_deref() {
        None | Some(OVERALL_CATEGORY) => None,
        Some(name) => {
            let registry = ctx.load_registry()?;
            Some(registry.require(name)?.name.clone())
        }
    };

    let db = ctx.open_database()?;
    let tournament = ctx.resolve_tournament(&db, &args.tournament.tournament)?;
    trace_command!(ctx.cli, ctx.start, "resolve_tournament");

    commands::scores::execute(ctx.cli, &db, &tournament, category.as_deref())
}

pub(super) fn handle_rank(ctx: &CommandContext, args: &RankArgs) -> Result<()> {
    let registry = ctx.load_registry()?;
    let category = RankCategory::resolve(&args.category, &registry)?;
    let grouping = args
        .grouping
        .map(Grouping::from)
        .unwrap_or_else(|| Grouping::default_for(&category));

    let db = ctx.open_database()?;
    let tournament = ctx.resolve_tournament(&db, &args.tournament.tournament)?;
    trace_command!(ctx.cli, ctx.start, "resolve_tournament");

    let options = RankOptions {
        category,
        grouping,
        winner: registry.winner_criteria(),
        team: args.team,
        quartiles: args.quartiles,
    };
    commands::rank::execute(ctx.cli, &db, &tournament, &options)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");
    Ok(())
}

pub(super) fn handle_completeness(ctx: &CommandContext, args: &TournamentArgs) -> Result<()> {
    let registry = ctx.load_registry()?;
    let db = ctx.open_database()?;
    let tournament = ctx.resolve_tournament(&db, &args.tournament)?;
    commands::completeness::execute(ctx.cli, &db, &tournament, &registry)
}
