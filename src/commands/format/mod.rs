//! Shared output formatting helpers for commands
//!
//! Provides common patterns for JSON status messages, Records headers,
//! and the stale-score warning.

pub mod status;

pub use crate::output_by_format_result;
pub use status::{print_json_status, print_records_header, warn_if_stale};
