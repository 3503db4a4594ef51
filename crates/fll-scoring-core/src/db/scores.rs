use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::{Result, ScoringError};

use super::registry::team_registration;

/// A registered team with its score in one category, if it has one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScoreRow {
    pub team_number: i32,
    pub team_name: String,
    pub award_group: String,
    pub judging_group: String,
    pub score: Option<f64>,
}

fn score_row(row: &rusqlite::Row) -> rusqlite::Result<TeamScoreRow> {
    Ok(TeamScoreRow {
        team_number: row.get(0)?,
        team_name: row.get(1)?,
        award_group: row.get(2)?,
        judging_group: row.get(3)?,
        score: row.get(4)?,
    })
}

impl super::Database {
    /// Final score of a team in one category; `None` when it has none
    pub fn get_final_score(
        &self,
        tournament: i64,
        team_number: i32,
        category: &str,
    ) -> Result<Option<f64>> {
        self.conn
            .query_row(
                "SELECT final_score FROM final_scores
                 WHERE tournament = ?1 AND team_number = ?2 AND category = ?3",
                params![tournament, team_number, category],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ScoringError::db_operation("read final score", e))
    }

    /// Overall score of a registered team.
    ///
    /// A team registered after the last recompute has no row yet and scores 0.
    pub fn get_overall_score(&self, tournament: i64, team_number: i32) -> Result<f64> {
        team_registration(&self.conn, tournament, team_number)?;

        let score: Option<f64> = self
            .conn
            .query_row(
                "SELECT overall_score FROM overall_scores
                 WHERE tournament = ?1 AND team_number = ?2",
                params![tournament, team_number],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ScoringError::db_operation("read overall score", e))?;

        Ok(score.unwrap_or(0.0))
    }

    /// Every registered team with its final score in `category`
    pub fn final_scores(&self, tournament: i64, category: &str) -> Result<Vec<TeamScoreRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT tt.team_number, t.team_name, tt.award_group, tt.judging_group, f.final_score
                 FROM tournament_teams tt
                 JOIN teams t ON t.team_number = tt.team_number
                 LEFT JOIN final_scores f
                     ON f.tournament = tt.tournament
                     AND f.team_number = tt.team_number
                     AND f.category = ?2
                 WHERE tt.tournament = ?1
                 ORDER BY tt.team_number",
            )
            .map_err(|e| ScoringError::db_operation("prepare final score list", e))?;

        let rows = stmt
            .query_map(params![tournament, category], score_row)
            .map_err(|e| ScoringError::db_operation("list final scores", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ScoringError::db_operation("read final score", e))?;

        Ok(rows)
    }

    /// Every registered team with its overall score
    pub fn overall_scores(&self, tournament: i64) -> Result<Vec<TeamScoreRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT tt.team_number, t.team_name, tt.award_group, tt.judging_group, o.overall_score
                 FROM tournament_teams tt
                 JOIN teams t ON t.team_number = tt.team_number
                 LEFT JOIN overall_scores o
                     ON o.tournament = tt.tournament
                     AND o.team_number = tt.team_number
                 WHERE tt.tournament = ?1
                 ORDER BY tt.team_number",
            )
            .map_err(|e| ScoringError::db_operation("prepare overall score list", e))?;

        let rows = stmt
            .query_map(params![tournament], score_row)
            .map_err(|e| ScoringError::db_operation("list overall scores", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ScoringError::db_operation("read overall score", e))?;

        Ok(rows)
    }
}
