//! Final scores: raw category totals rescaled into the tournament's common
//! range.

use std::time::Instant;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::category::{CategoryKind, CategoryRegistry, GoalRef, ScoreCategory};
use crate::config::SeedingScore;
use crate::error::{Result, ScoringError};
use crate::trace_time;

/// Final score rows written per category kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub performance: usize,
    pub subjective: usize,
    pub virtual_subjective: usize,
}

impl SummaryStats {
    pub fn total(&self) -> usize {
        self.performance + self.subjective + self.virtual_subjective
    }
}

/// Replace every final score of a tournament.
///
/// Runs on the caller's connection so it can share a transaction with the
/// overall aggregation.
#[tracing::instrument(skip(conn, registry))]
pub fn summarize_scores(
    conn: &Connection,
    tournament: i64,
    registry: &CategoryRegistry,
) -> Result<SummaryStats> {
    let start = Instant::now();
    let range = registry.max_score_range();

    conn.execute(
        "DELETE FROM final_scores WHERE tournament = ?1",
        params![tournament],
    )
    .map_err(|e| ScoringError::db_operation("clear final scores", e))?;

    let mut stats = SummaryStats {
        performance: summarize_performance(
            conn,
            tournament,
            registry.performance(),
            range,
            registry.seeding_score(),
        )?,
        ..SummaryStats::default()
    };

    for category in registry.subjective() {
        stats.subjective += summarize_subjective(conn, tournament, category, range)?;
    }

    populate_virtual_goals(conn, tournament, registry)?;
    for category in registry.virtual_subjective() {
        stats.virtual_subjective += summarize_virtual(conn, tournament, category, range)?;
    }

    trace_time!(start, "summarize_scores", rows = stats.total());
    Ok(stats)
}

/// Seeding score per team, rescaled.
///
/// Every run total is raised to the category minimum before the runs are
/// combined, so a penalty-heavy run never drags a team below it. The run
/// filter matches the `performance_seeding_max` view.
fn summarize_performance(
    conn: &Connection,
    tournament: i64,
    category: &ScoreCategory,
    range: f64,
    seeding_score: SeedingScore,
) -> Result<usize> {
    let CategoryKind::Performance { min_score } = category.kind else {
        crate::bail_challenge!("{} is not a performance category", category.name);
    };
    let combine = match seeding_score {
        SeedingScore::Max => "MAX",
        SeedingScore::Average => "AVG",
    };
    let sql = format!(
        "INSERT INTO final_scores (tournament, category, team_number, final_score)
         SELECT p.tournament, ?2, p.team_number,
                {combine}(MAX(p.computed_total, ?5)) * ?3 / ?4
         FROM performance p
         JOIN tournaments t ON t.tournament_id = p.tournament
         WHERE p.tournament = ?1
           AND p.run_number <= t.seeding_rounds
           AND p.bye = 0
           AND p.no_show = 0
           AND p.computed_total IS NOT NULL
         GROUP BY p.tournament, p.team_number"
    );

    let rows = conn
        .execute(
            &sql,
            params![tournament, category.name, range, category.max_score, min_score],
        )
        .map_err(|e| ScoringError::db_operation("summarize performance", e))?;

    tracing::debug!(category = %category.name, rows, "Summarized performance");
    Ok(rows)
}

fn summarize_subjective(
    conn: &Connection,
    tournament: i64,
    category: &ScoreCategory,
    range: f64,
) -> Result<usize> {
    let rows = conn
        .execute(
            "INSERT INTO final_scores (tournament, category, team_number, final_score)
             SELECT tournament, category, team_number, AVG(computed_total) * ?3 / ?4
             FROM subjective_computed_scores
             WHERE tournament = ?1 AND category = ?2 AND computed_total IS NOT NULL
             GROUP BY tournament, category, team_number",
            params![tournament, category.name, range, category.max_score],
        )
        .map_err(|e| ScoringError::db_operation("summarize subjective category", e))?;

    tracing::debug!(category = %category.name, rows, "Summarized subjective category");
    Ok(rows)
}

/// Rebuild the averaged goal values that feed virtual categories.
///
/// A scoring instance is a judge who entered anything for the team in the
/// source category; goals that judge left empty count as 0.
fn populate_virtual_goals(
    conn: &Connection,
    tournament: i64,
    registry: &CategoryRegistry,
) -> Result<()> {
    conn.execute(
        "DELETE FROM virtual_subjective_category WHERE tournament_id = ?1",
        params![tournament],
    )
    .map_err(|e| ScoringError::db_operation("clear virtual goal scores", e))?;

    for category in registry.virtual_subjective() {
        let CategoryKind::VirtualSubjective { goal_refs } = &category.kind else {
            continue;
        };
        for goal_ref in goal_refs {
            populate_goal_ref(conn, tournament, &category.name, goal_ref)?;
        }
    }

    Ok(())
}

fn populate_goal_ref(
    conn: &Connection,
    tournament: i64,
    category: &str,
    goal_ref: &GoalRef,
) -> Result<()> {
    let rows = conn
        .execute(
            "INSERT INTO virtual_subjective_category
                 (tournament_id, category_name, source_category_name, goal_name, team_number, goal_score)
             SELECT ?1, ?2, ?3, ?4, i.team_number, AVG(IFNULL(g.goal_value, 0))
             FROM (
                 SELECT team_number, judge FROM subjective_computed_scores
                 WHERE tournament = ?1 AND category = ?3
                 UNION
                 SELECT team_number, judge FROM subjective_goal_scores
                 WHERE tournament = ?1 AND category = ?3
             ) i
             LEFT JOIN subjective_goal_scores g
                 ON g.tournament = ?1
                 AND g.category = ?3
                 AND g.team_number = i.team_number
                 AND g.judge = i.judge
                 AND g.goal_name = ?4
             GROUP BY i.team_number",
            params![tournament, category, goal_ref.category, goal_ref.goal],
        )
        .map_err(|e| ScoringError::db_operation("populate virtual goal scores", e))?;

    tracing::trace!(
        category,
        source = %goal_ref.category,
        goal = %goal_ref.goal,
        rows,
        "Averaged goal for virtual category"
    );
    Ok(())
}

fn summarize_virtual(
    conn: &Connection,
    tournament: i64,
    category: &ScoreCategory,
    range: f64,
) -> Result<usize> {
    let rows = conn
        .execute(
            "INSERT INTO final_scores (tournament, category, team_number, final_score)
             SELECT tournament_id, category_name, team_number, SUM(goal_score) * ?3 / ?4
             FROM virtual_subjective_category
             WHERE tournament_id = ?1 AND category_name = ?2
             GROUP BY tournament_id, category_name, team_number",
            params![tournament, category.name, range, category.max_score],
        )
        .map_err(|e| ScoringError::db_operation("summarize virtual category", e))?;

    tracing::debug!(category = %category.name, rows, "Summarized virtual category");
    Ok(rows)
}
