//! Challenge description type definitions

use serde::{Deserialize, Serialize};

/// Which end of the score range wins.
///
/// Applies tournament-wide to every category and to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinnerCriteria {
    /// Higher scores are better
    #[default]
    High,
    /// Lower scores are better
    Low,
}

impl WinnerCriteria {
    pub fn ascending_is_better(self) -> bool {
        self == WinnerCriteria::Low
    }
}

/// Which seeding-round statistic feeds the performance final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedingScore {
    /// Best seeding-round score
    #[default]
    Max,
    /// Average over the seeding rounds
    Average,
}

/// Challenge description as written in the challenge TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Challenge title, for display only
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub winner_criteria: WinnerCriteria,

    #[serde(default)]
    pub seeding_score: SeedingScore,

    pub performance: PerformanceConfig,

    #[serde(default)]
    pub subjective: Vec<SubjectiveConfig>,

    #[serde(default)]
    pub virtual_subjective: Vec<VirtualSubjectiveConfig>,
}

/// The performance (robot game) category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_performance_title")]
    pub title: String,

    pub max_score: f64,

    #[serde(default)]
    pub min_score: f64,

    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// An ordinary subjective (judged) category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectiveConfig {
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub goals: Vec<GoalConfig>,
}

/// A directly scored goal of a subjective category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub min: f64,

    pub max: f64,
}

/// A category made up of goals from other subjective categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualSubjectiveConfig {
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub goal_refs: Vec<GoalRefConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRefConfig {
    /// Name of the source subjective category
    pub category: String,
    /// Goal name within the source category
    pub goal: String,
}

fn default_weight() -> f64 {
    1.0
}

fn default_performance_title() -> String {
    "Performance".to_string()
}
