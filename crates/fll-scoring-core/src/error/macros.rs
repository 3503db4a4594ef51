//! Error macros for fll-scoring

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::ScoringError::invalid_value($context, $value))
    };
}

/// Macro for rejecting a challenge description
#[macro_export]
macro_rules! bail_challenge {
    ($($arg:tt)*) => {
        return Err($crate::error::ScoringError::invalid_challenge(format!($($arg)*)))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::ScoringError::UsageError($msg.to_string()))
    };
}

/// Macro for mapping database errors
#[macro_export]
macro_rules! map_db_err {
    ($op:expr, $error:expr) => {
        $crate::error::ScoringError::db_operation($op, $error)
    };
}
