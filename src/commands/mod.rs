//! CLI commands for fll-scoring

pub mod completeness;
pub mod dispatch;
pub mod format;
pub mod init;
pub mod load;
pub mod rank;
pub mod recompute;
pub mod scores;
pub mod status;
