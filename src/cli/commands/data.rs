//! Data import command argument structures

use clap::Args;
use std::path::PathBuf;

/// Arguments for the load command.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// JSON dump to import
    pub file: PathBuf,

    /// Recompute scores after loading (requires --challenge)
    #[arg(long)]
    pub recompute: bool,
}
