use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{Result, ScoringError};
use crate::staleness::ModificationState;

/// Seeding rounds used when a tournament does not configure its own
pub const DEFAULT_SEEDING_ROUNDS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Performance runs up to this number count toward the seeding score
    pub seeding_rounds: u32,
}

/// The three modification stamps of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stamp {
    PerformanceSeeding,
    Subjective,
    Summary,
}

impl Stamp {
    fn column(self) -> &'static str {
        match self {
            Stamp::PerformanceSeeding => "performance_seeding_modified",
            Stamp::Subjective => "subjective_modified",
            Stamp::Summary => "summary_computed",
        }
    }
}

/// Set one stamp from the store clock.
///
/// The new value is strictly greater than every stamp the tournament already
/// carries, so stamps never tie and never move backwards even when the clock
/// does.
pub(super) fn mark(conn: &Connection, tournament: i64, stamp: Stamp) -> Result<()> {
    let sql = format!(
        "UPDATE tournaments SET {} = MAX(
             CAST(ROUND((julianday('now') - 2440587.5) * 86400000000.0) AS INTEGER),
             COALESCE(performance_seeding_modified, 0) + 1,
             COALESCE(subjective_modified, 0) + 1,
             COALESCE(summary_computed, 0) + 1)
         WHERE tournament_id = ?1",
        stamp.column()
    );

    let changed = conn
        .execute(&sql, params![tournament])
        .map_err(|e| ScoringError::db_operation(&format!("set {}", stamp.column()), e))?;
    if changed == 0 {
        return Err(ScoringError::TournamentNotFound(tournament.to_string()));
    }

    tracing::trace!(tournament, stamp = stamp.column(), "Stamped tournament");
    Ok(())
}

pub(super) fn read_modification_state(
    conn: &Connection,
    tournament: i64,
) -> Result<ModificationState> {
    let stamps: Option<(Option<i64>, Option<i64>, Option<i64>)> = conn
        .query_row(
            "SELECT performance_seeding_modified, subjective_modified, summary_computed
             FROM tournaments WHERE tournament_id = ?1",
            params![tournament],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .map_err(|e| ScoringError::db_operation("read modification state", e))?;

    let (perf, subj, summary) =
        stamps.ok_or_else(|| ScoringError::TournamentNotFound(tournament.to_string()))?;

    Ok(ModificationState {
        performance_seeding_modified: micros_to_datetime(perf)?,
        subjective_modified: micros_to_datetime(subj)?,
        summary_computed: micros_to_datetime(summary)?,
    })
}

fn micros_to_datetime(micros: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    micros
        .map(|m| {
            DateTime::<Utc>::from_timestamp_micros(m)
                .ok_or_else(|| ScoringError::invalid_value("modification stamp", m))
        })
        .transpose()
}

pub(super) fn get_tournament(conn: &Connection, tournament: i64) -> Result<Tournament> {
    conn.query_row(
        "SELECT tournament_id, name, description, seeding_rounds
         FROM tournaments WHERE tournament_id = ?1",
        params![tournament],
        tournament_from_row,
    )
    .optional()
    .map_err(|e| ScoringError::db_operation("read tournament", e))?
    .ok_or_else(|| ScoringError::TournamentNotFound(tournament.to_string()))
}

fn tournament_from_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        seeding_rounds: row.get(3)?,
    })
}

impl super::Database {
    pub fn create_tournament(
        &self,
        name: &str,
        description: Option<&str>,
        seeding_rounds: u32,
    ) -> Result<Tournament> {
        let name = name.trim();
        if name.is_empty() {
            crate::bail_invalid!("tournament name", "(empty)");
        }
        if name.parse::<i64>().is_ok() {
            // numeric names would be ambiguous with ids in find_tournament
            crate::bail_invalid!("tournament name", name);
        }

        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM tournaments WHERE name = ?1)",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| ScoringError::db_operation("check tournament name", e))?;
        if exists {
            return Err(ScoringError::already_exists("tournament", name));
        }

        self.conn
            .execute(
                "INSERT INTO tournaments (name, description, seeding_rounds) VALUES (?1, ?2, ?3)",
                params![name, description, seeding_rounds],
            )
            .map_err(|e| ScoringError::db_operation("create tournament", e))?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(tournament = id, name, "Created tournament");

        Ok(Tournament {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            seeding_rounds,
        })
    }

    /// Look a tournament up by name, or by numeric id
    pub fn find_tournament(&self, name_or_id: &str) -> Result<Tournament> {
        let by_name = self
            .conn
            .query_row(
                "SELECT tournament_id, name, description, seeding_rounds
                 FROM tournaments WHERE name = ?1",
                params![name_or_id],
                tournament_from_row,
            )
            .optional()
            .map_err(|e| ScoringError::db_operation("find tournament", e))?;
        if let Some(tournament) = by_name {
            return Ok(tournament);
        }

        match name_or_id.parse::<i64>() {
            Ok(id) => get_tournament(&self.conn, id)
                .map_err(|_| ScoringError::TournamentNotFound(name_or_id.to_string())),
            Err(_) => Err(ScoringError::TournamentNotFound(name_or_id.to_string())),
        }
    }

    pub fn get_tournament(&self, tournament: i64) -> Result<Tournament> {
        get_tournament(&self.conn, tournament)
    }

    pub fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT tournament_id, name, description, seeding_rounds
                 FROM tournaments ORDER BY tournament_id",
            )
            .map_err(|e| ScoringError::db_operation("prepare tournament list", e))?;

        let tournaments = stmt
            .query_map([], tournament_from_row)
            .map_err(|e| ScoringError::db_operation("list tournaments", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ScoringError::db_operation("read tournament", e))?;

        Ok(tournaments)
    }

    pub fn modification_state(&self, tournament: i64) -> Result<ModificationState> {
        read_modification_state(&self.conn, tournament)
    }

    /// Whether final and overall scores of the tournament may be stale
    pub fn needs_recompute(&self, tournament: i64) -> Result<bool> {
        Ok(self.modification_state(tournament)?.needs_recompute())
    }

    pub fn mark_performance_modified(&self, tournament: i64) -> Result<()> {
        mark(&self.conn, tournament, Stamp::PerformanceSeeding)
    }

    pub fn mark_subjective_modified(&self, tournament: i64) -> Result<()> {
        mark(&self.conn, tournament, Stamp::Subjective)
    }

    pub fn mark_summary_computed(&self, tournament: i64) -> Result<()> {
        mark(&self.conn, tournament, Stamp::Summary)
    }
}
