//! SQLite store for tournament scores
//!
//! Raw scores are written by collaborators through the helpers in
//! `raw_scores`; the engine derives `final_scores`, `overall_scores` and
//! `virtual_subjective_category` from them in `recompute`.

mod aggregate;
mod completeness;
mod rank;
mod raw_scores;
mod recompute;
mod registry;
mod schema;
mod scores;
mod summarize;
mod tournament;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Result, ScoringError};

pub use aggregate::update_overall_scores;
pub use completeness::JudgeSummary;
pub use rank::{GroupRanking, RankedTeam};
pub use raw_scores::{GoalScore, PerformanceRun, SubjectiveScore};
pub use recompute::RecomputeSummary;
pub use registry::{JudgeAssignment, TournamentTeam};
pub use schema::{create_schema, CURRENT_SCHEMA_VERSION};
pub use scores::TeamScoreRow;
pub use summarize::{summarize_scores, SummaryStats};
pub use tournament::{Tournament, DEFAULT_SEEDING_ROUNDS};

/// Writers wait this long for a competing writer before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database holding raw and derived scores
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file at `path`
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            ScoringError::Other(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        // Readers keep seeing the last committed summary while a recompute runs
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ScoringError::db_operation("enable WAL mode", e))?;

        Self::configure(conn)
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ScoringError::db_operation("open in-memory database", e))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| ScoringError::db_operation("set busy timeout", e))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| ScoringError::db_operation("enable foreign keys", e))?;

        create_schema(&conn)?;

        Ok(Database { conn })
    }

    /// Start a write transaction that takes the write lock up front.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    fn begin_write(&self, operation: &str) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| ScoringError::transaction(operation, e))
    }

    pub fn get_schema_version(&self) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| ScoringError::db_operation("get schema version", e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

#[cfg(test)]
mod tests;
