//! JSON tournament dump format

use serde::{Deserialize, Serialize};

use fll_scoring_core::db::{
    GoalScore, JudgeAssignment, PerformanceRun, SubjectiveScore, TournamentTeam,
    DEFAULT_SEEDING_ROUNDS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDump {
    pub tournament: TournamentInfo,
    #[serde(default)]
    pub teams: Vec<TournamentTeam>,
    #[serde(default)]
    pub judges: Vec<JudgeAssignment>,
    #[serde(default)]
    pub performance: Vec<PerformanceRun>,
    #[serde(default)]
    pub subjective: Vec<SubjectiveScore>,
    #[serde(default)]
    pub goals: Vec<GoalScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seeding_rounds")]
    pub seeding_rounds: u32,
}

fn default_seeding_rounds() -> u32 {
    DEFAULT_SEEDING_ROUNDS
}

/// Rows imported per section
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadCounts {
    pub teams: usize,
    pub judges: usize,
    pub performance: usize,
    pub subjective: usize,
    pub goals: usize,
}
