use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::CategoryRegistry;
use crate::error::{Result, ScoringError};
use crate::trace_time;

use super::aggregate::update_overall_scores;
use super::summarize::{summarize_scores, SummaryStats};
use super::tournament::{get_tournament, read_modification_state};

/// Outcome of one summarize-and-aggregate run
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeSummary {
    pub tournament: i64,
    pub final_scores: SummaryStats,
    pub overall_scores: usize,
    pub summary_computed: Option<DateTime<Utc>>,
}

impl super::Database {
    /// Recompute every final and overall score of a tournament.
    ///
    /// Both replace-all passes and the summary stamp share one immediate
    /// transaction. On error nothing is committed and the previous scores and
    /// stamp stay as they were.
    #[tracing::instrument(skip(self, registry))]
    pub fn summarize_and_aggregate(
        &self,
        tournament: i64,
        registry: &CategoryRegistry,
    ) -> Result<RecomputeSummary> {
        let start = Instant::now();

        let tx = self.begin_write("recompute")?;
        get_tournament(&tx, tournament)?;

        let final_scores = summarize_scores(&tx, tournament, registry)?;
        let overall_scores = update_overall_scores(&tx, tournament, &registry.weights())?;
        let state = read_modification_state(&tx, tournament)?;

        tx.commit()
            .map_err(|e| ScoringError::transaction("commit recompute", e))?;

        trace_time!(start, "summarize_and_aggregate", tournament = tournament);
        tracing::info!(
            tournament,
            final_scores = final_scores.total(),
            overall_scores,
            "Recomputed tournament scores"
        );

        Ok(RecomputeSummary {
            tournament,
            final_scores,
            overall_scores,
            summary_computed: state.summary_computed,
        })
    }

    /// Recompute only when raw data changed since the last summary.
    ///
    /// Returns `None` when the persisted scores were already current.
    pub fn compute_if_needed(
        &self,
        tournament: i64,
        registry: &CategoryRegistry,
    ) -> Result<Option<RecomputeSummary>> {
        if !self.needs_recompute(tournament)? {
            tracing::debug!(tournament, "Summary is current, skipping recompute");
            return Ok(None);
        }

        self.summarize_and_aggregate(tournament, registry).map(Some)
    }
}
