//! Judge completeness: how many of a judging group's teams each judge has
//! entered. Advisory only, recompute never consults it.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::category::CategoryRegistry;
use crate::error::{Result, ScoringError};

use super::tournament::get_tournament;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeSummary {
    /// `None` for a category no judge was assigned to in this group
    pub judge: Option<String>,
    pub category: String,
    pub group: String,
    /// Teams in the judging group
    pub expected: u32,
    /// Teams with a score or a recorded no-show from this judge
    pub actual: u32,
}

impl JudgeSummary {
    pub fn is_complete(&self) -> bool {
        self.actual >= self.expected
    }
}

fn group_sizes(conn: &Connection, tournament: i64) -> Result<BTreeMap<String, u32>> {
    let mut stmt = conn
        .prepare(
            "SELECT judging_group, COUNT(*) FROM tournament_teams
             WHERE tournament = ?1 GROUP BY judging_group",
        )
        .map_err(|e| ScoringError::db_operation("prepare group size query", e))?;

    let sizes = stmt
        .query_map(params![tournament], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| ScoringError::db_operation("count group teams", e))?
        .collect::<rusqlite::Result<BTreeMap<String, u32>>>()
        .map_err(|e| ScoringError::db_operation("read group size", e))?;

    Ok(sizes)
}

fn entered_count(
    conn: &Connection,
    tournament: i64,
    category: &str,
    judge: &str,
    group: &str,
) -> Result<u32> {
    conn.query_row(
        "SELECT COUNT(DISTINCT s.team_number)
         FROM subjective_computed_scores s
         JOIN tournament_teams tt
             ON tt.tournament = s.tournament AND tt.team_number = s.team_number
         WHERE s.tournament = ?1
           AND s.category = ?2
           AND s.judge = ?3
           AND tt.judging_group = ?4
           AND (s.computed_total IS NOT NULL OR s.no_show = 1)",
        params![tournament, category, judge, group],
        |row| row.get(0),
    )
    .map_err(|e| ScoringError::db_operation("count judge entries", e))
}

impl super::Database {
    /// One entry per judge assignment, plus one judge-less entry for every
    /// subjective category nobody judges in a group.
    #[tracing::instrument(skip(self, registry))]
    pub fn judge_summaries(
        &self,
        tournament: i64,
        registry: &CategoryRegistry,
    ) -> Result<Vec<JudgeSummary>> {
        get_tournament(&self.conn, tournament)?;

        let sizes = group_sizes(&self.conn, tournament)?;
        let judges = self.judges(tournament)?;

        let mut groups: BTreeSet<String> = sizes.keys().cloned().collect();
        groups.extend(judges.iter().map(|j| j.judging_group.clone()));

        let mut summaries = Vec::new();
        for group in &groups {
            let expected = sizes.get(group).copied().unwrap_or(0);
            let mut judged = BTreeSet::new();

            for judge in judges.iter().filter(|j| &j.judging_group == group) {
                judged.insert(judge.category.as_str());
                summaries.push(JudgeSummary {
                    judge: Some(judge.judge_id.clone()),
                    category: judge.category.clone(),
                    group: group.clone(),
                    expected,
                    actual: entered_count(
                        &self.conn,
                        tournament,
                        &judge.category,
                        &judge.judge_id,
                        group,
                    )?,
                });
            }

            for category in registry.subjective() {
                if judged.contains(category.name.as_str()) {
                    continue;
                }
                tracing::debug!(group = %group, category = %category.name, "No judge assigned");
                summaries.push(JudgeSummary {
                    judge: None,
                    category: category.name.clone(),
                    group: group.clone(),
                    expected,
                    actual: 0,
                });
            }
        }

        Ok(summaries)
    }
}
