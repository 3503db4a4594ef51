//! Error types and exit codes for fll-scoring
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (store errors included)
//! - 2: Usage or validation error (bad flags, malformed challenge description)
//! - 3: Data error (unknown tournament, team or category)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage or validation error (2)
    Usage = 2,
    /// Unknown tournament, team or category (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Coarse classification callers branch on.
///
/// A `Store` error means the current operation was aborted and its
/// transaction rolled back; previously committed rows are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Store,
    Validation,
    Usage,
    NotFound,
    Other,
}

impl From<rusqlite::Error> for ScoringError {
    fn from(err: rusqlite::Error) -> Self {
        ScoringError::Store {
            operation: "access store".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur while loading, aggregating or ranking scores
#[derive(Error, Debug)]
pub enum ScoringError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid challenge description: {reason}")]
    InvalidChallenge { reason: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("tournament not found: {0}")]
    TournamentNotFound(String),

    #[error("team {team} is not registered in tournament {tournament}")]
    TeamNotFound { tournament: i64, team: i32 },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("failed to {operation}: {reason}")]
    Store { operation: String, reason: String },

    #[error("failed to read {path:?}: {reason}")]
    ReadFile { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl ScoringError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        ScoringError::Store {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        ScoringError::Store {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ScoringError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a malformed challenge description
    pub fn invalid_challenge(reason: impl Into<String>) -> Self {
        ScoringError::InvalidChallenge {
            reason: reason.into(),
        }
    }

    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        ScoringError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::Store { .. } => ErrorKind::Store,
            ScoringError::InvalidChallenge { .. }
            | ScoringError::InvalidValue { .. }
            | ScoringError::Toml(_) => ErrorKind::Validation,
            ScoringError::UnknownFormat(_) | ScoringError::UsageError(_) => ErrorKind::Usage,
            ScoringError::TournamentNotFound(_)
            | ScoringError::TeamNotFound { .. }
            | ScoringError::UnknownCategory(_) => ErrorKind::NotFound,
            ScoringError::AlreadyExists { .. }
            | ScoringError::ReadFile { .. }
            | ScoringError::Io(_)
            | ScoringError::Json(_)
            | ScoringError::Other(_) => ErrorKind::Other,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ScoringError::AlreadyExists { .. } => ExitCode::Data,
            _ => match self.kind() {
                ErrorKind::Validation | ErrorKind::Usage => ExitCode::Usage,
                ErrorKind::NotFound => ExitCode::Data,
                ErrorKind::Store | ErrorKind::Other => ExitCode::Failure,
            },
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            ScoringError::UnknownFormat(_) => "unknown_format",
            ScoringError::UsageError(_) => "usage_error",
            ScoringError::InvalidChallenge { .. } => "invalid_challenge",
            ScoringError::InvalidValue { .. } => "invalid_value",
            ScoringError::TournamentNotFound(_) => "tournament_not_found",
            ScoringError::TeamNotFound { .. } => "team_not_found",
            ScoringError::UnknownCategory(_) => "unknown_category",
            ScoringError::AlreadyExists { .. } => "already_exists",
            ScoringError::Store { .. } => "store_error",
            ScoringError::ReadFile { .. } => "read_error",
            ScoringError::Io(_) => "io_error",
            ScoringError::Json(_) => "json_error",
            ScoringError::Toml(_) => "toml_error",
            ScoringError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for fll-scoring operations
pub type Result<T> = std::result::Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rusqlite_errors_are_store_errors() {
        let err: ScoringError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(err.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_validation_errors_are_usage_exit_codes() {
        let err = ScoringError::invalid_challenge("weight must be non-negative");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.exit_code(), ExitCode::Usage);
    }

    #[test]
    fn test_json_envelope() {
        let err = ScoringError::TeamNotFound {
            tournament: 1,
            team: 42,
        };
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "team_not_found");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("team 42"));
    }
}
