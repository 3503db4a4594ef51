//! Challenge description loading
//!
//! The challenge description is a TOML file naming the performance category,
//! the subjective categories with their goals, and any virtual categories.
//! Parsing only checks the shape; numeric validation happens when the
//! description is turned into a [`CategoryRegistry`](crate::category::CategoryRegistry).

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{Result, ScoringError};

pub use types::{
    ChallengeConfig, GoalConfig, GoalRefConfig, PerformanceConfig, SeedingScore,
    SubjectiveConfig, VirtualSubjectiveConfig, WinnerCriteria,
};

impl ChallengeConfig {
    /// Load a challenge description from a file
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScoringError::ReadFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: ChallengeConfig = toml::from_str(content)?;
        tracing::debug!(
            subjective = config.subjective.len(),
            virtual_subjective = config.virtual_subjective.len(),
            "Parsed challenge description"
        );
        Ok(config)
    }
}
