//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::Cli;
use fll_scoring_core::bail_usage;
use fll_scoring_core::category::CategoryRegistry;
use fll_scoring_core::db::{Database, Tournament};
use fll_scoring_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    pub fn open_database(&self) -> Result<Database> {
        Database::open(&self.cli.db)
    }

    /// Load and validate the challenge description named by `--challenge`
    pub fn load_registry(&self) -> Result<CategoryRegistry> {
        let Some(path) = &self.cli.challenge else {
            bail_usage!("a challenge description is required (--challenge or FLL_SCORING_CHALLENGE)");
        };
        CategoryRegistry::load(path)
    }

    pub fn resolve_tournament(&self, db: &Database, name_or_id: &str) -> Result<Tournament> {
        db.find_tournament(name_or_id)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("fll-scoring {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Score aggregation and ranking for robotics tournaments.");
        println!();
        println!("Run `fll-scoring --help` for usage information.");
        Ok(())
    }
}
