use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use crate::category::CategoryWeights;
use crate::error::{Result, ScoringError};

use super::tournament::{mark, Stamp};

/// Replace the overall scores of a tournament and stamp the summary.
///
/// Every registered team gets exactly one row: the sum of its final scores
/// weighted by the categories' weights. Categories without a positive known
/// weight contribute nothing, and a team without final scores totals 0.
/// Returns the number of rows written.
#[tracing::instrument(skip(conn, weights))]
pub fn update_overall_scores(
    conn: &Connection,
    tournament: i64,
    weights: &CategoryWeights,
) -> Result<usize> {
    conn.execute(
        "DELETE FROM overall_scores WHERE tournament = ?1",
        params![tournament],
    )
    .map_err(|e| ScoringError::db_operation("clear overall scores", e))?;

    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    {
        let mut stmt = conn
            .prepare("SELECT team_number FROM tournament_teams WHERE tournament = ?1")
            .map_err(|e| ScoringError::db_operation("prepare team query", e))?;
        let teams = stmt
            .query_map(params![tournament], |row| row.get::<_, i32>(0))
            .map_err(|e| ScoringError::db_operation("list teams", e))?;
        for team in teams {
            let team = team.map_err(|e| ScoringError::db_operation("read team", e))?;
            totals.insert(team, 0.0);
        }
    }

    {
        let mut stmt = conn
            .prepare(
                "SELECT team_number, category, final_score FROM final_scores
                 WHERE tournament = ?1",
            )
            .map_err(|e| ScoringError::db_operation("prepare final score query", e))?;
        let mut rows = stmt
            .query(params![tournament])
            .map_err(|e| ScoringError::db_operation("read final scores", e))?;

        while let Some(row) = rows
            .next()
            .map_err(|e| ScoringError::db_operation("read final score", e))?
        {
            let team: i32 = row.get(0)?;
            let category: String = row.get(1)?;
            let score: f64 = row.get(2)?;

            let Some(weight) = weights.contributing(&category) else {
                continue;
            };
            match totals.get_mut(&team) {
                Some(total) => *total += score * weight,
                None => {
                    tracing::warn!(team, category = %category, "Final score for unregistered team ignored");
                }
            }
        }
    }

    let mut insert = conn
        .prepare(
            "INSERT INTO overall_scores (tournament, team_number, overall_score)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| ScoringError::db_operation("prepare overall score insert", e))?;
    for (team, total) in &totals {
        insert
            .execute(params![tournament, team, total])
            .map_err(|e| ScoringError::db_operation("insert overall score", e))?;
    }

    mark(conn, tournament, Stamp::Summary)?;

    tracing::debug!(teams = totals.len(), "Updated overall scores");
    Ok(totals.len())
}
