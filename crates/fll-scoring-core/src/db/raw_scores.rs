//! Raw score writes on behalf of score entry collaborators.
//!
//! Each write stamps the matching modification time in the same
//! transaction, so a summary computed afterwards is never mistaken for
//! fresh.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

use super::registry::team_registration;
use super::tournament::{get_tournament, mark, Stamp};

/// One performance run of a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRun {
    pub team_number: i32,
    pub run_number: u32,
    /// Total computed by score entry; `None` while the run is unscored
    pub computed_total: Option<f64>,
    #[serde(default)]
    pub no_show: bool,
    #[serde(default)]
    pub bye: bool,
    #[serde(default)]
    pub verified: bool,
}

/// One judge's computed total for a team in a subjective category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectiveScore {
    pub category: String,
    pub team_number: i32,
    pub judge: String,
    pub computed_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_score: Option<f64>,
    #[serde(default)]
    pub no_show: bool,
}

/// One judge's raw value for a single goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalScore {
    pub category: String,
    pub team_number: i32,
    pub judge: String,
    pub goal_name: String,
    pub goal_value: Option<f64>,
}

fn check_value(context: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => crate::bail_invalid!(context, v),
        _ => Ok(()),
    }
}

impl super::Database {
    /// Insert or replace a performance run.
    ///
    /// Only runs within the tournament's seeding rounds mark performance
    /// data as modified.
    pub fn record_performance_score(&self, tournament: i64, run: &PerformanceRun) -> Result<()> {
        check_value("performance total", run.computed_total)?;
        if run.run_number == 0 {
            crate::bail_invalid!("run number", run.run_number);
        }

        let tx = self.begin_write("record performance score")?;
        let seeding_rounds = get_tournament(&tx, tournament)?.seeding_rounds;
        team_registration(&tx, tournament, run.team_number)?;

        tx.execute(
            "INSERT OR REPLACE INTO performance
                 (tournament, team_number, run_number, computed_total, no_show, bye, verified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                tournament,
                run.team_number,
                run.run_number,
                run.computed_total,
                run.no_show,
                run.bye,
                run.verified
            ],
        )
        .map_err(|e| ScoringError::db_operation("record performance score", e))?;

        if run.run_number <= seeding_rounds {
            mark(&tx, tournament, Stamp::PerformanceSeeding)?;
        }

        tx.commit()
            .map_err(|e| ScoringError::transaction("commit performance score", e))?;

        tracing::debug!(
            tournament,
            team = run.team_number,
            run = run.run_number,
            "Recorded performance score"
        );
        Ok(())
    }

    pub fn record_subjective_score(&self, tournament: i64, score: &SubjectiveScore) -> Result<()> {
        check_value("subjective total", score.computed_total)?;
        check_value("standardized score", score.standardized_score)?;

        let tx = self.begin_write("record subjective score")?;
        get_tournament(&tx, tournament)?;
        team_registration(&tx, tournament, score.team_number)?;

        tx.execute(
            "INSERT OR REPLACE INTO subjective_computed_scores
                 (tournament, category, team_number, judge, computed_total, standardized_score, no_show)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                tournament,
                score.category,
                score.team_number,
                score.judge,
                score.computed_total,
                score.standardized_score,
                score.no_show
            ],
        )
        .map_err(|e| ScoringError::db_operation("record subjective score", e))?;

        mark(&tx, tournament, Stamp::Subjective)?;
        tx.commit()
            .map_err(|e| ScoringError::transaction("commit subjective score", e))?;

        tracing::debug!(
            tournament,
            category = %score.category,
            team = score.team_number,
            judge = %score.judge,
            "Recorded subjective score"
        );
        Ok(())
    }

    pub fn record_goal_score(&self, tournament: i64, score: &GoalScore) -> Result<()> {
        check_value("goal value", score.goal_value)?;

        let tx = self.begin_write("record goal score")?;
        get_tournament(&tx, tournament)?;
        team_registration(&tx, tournament, score.team_number)?;

        tx.execute(
            "INSERT OR REPLACE INTO subjective_goal_scores
                 (tournament, category, team_number, judge, goal_name, goal_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                tournament,
                score.category,
                score.team_number,
                score.judge,
                score.goal_name,
                score.goal_value
            ],
        )
        .map_err(|e| ScoringError::db_operation("record goal score", e))?;

        mark(&tx, tournament, Stamp::Subjective)?;
        tx.commit()
            .map_err(|e| ScoringError::transaction("commit goal score", e))?;

        Ok(())
    }

    /// Remove one judge's scores for a team in a category, goals included.
    ///
    /// Returns whether anything was deleted.
    pub fn delete_subjective_score(
        &self,
        tournament: i64,
        category: &str,
        team_number: i32,
        judge: &str,
    ) -> Result<bool> {
        let tx = self.begin_write("delete subjective score")?;
        get_tournament(&tx, tournament)?;

        let mut deleted = tx
            .execute(
                "DELETE FROM subjective_computed_scores
                 WHERE tournament = ?1 AND category = ?2 AND team_number = ?3 AND judge = ?4",
                params![tournament, category, team_number, judge],
            )
            .map_err(|e| ScoringError::db_operation("delete subjective score", e))?;
        deleted += tx
            .execute(
                "DELETE FROM subjective_goal_scores
                 WHERE tournament = ?1 AND category = ?2 AND team_number = ?3 AND judge = ?4",
                params![tournament, category, team_number, judge],
            )
            .map_err(|e| ScoringError::db_operation("delete goal scores", e))?;

        if deleted > 0 {
            mark(&tx, tournament, Stamp::Subjective)?;
        }
        tx.commit()
            .map_err(|e| ScoringError::transaction("commit subjective delete", e))?;

        tracing::debug!(tournament, category, team = team_number, judge, deleted, "Deleted subjective score");
        Ok(deleted > 0)
    }
}
