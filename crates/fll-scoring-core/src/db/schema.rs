//! SQLite schema for the score store

use rusqlite::Connection;

use crate::error::{Result, ScoringError};

pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
-- Tournaments and their modification stamps (microseconds since the epoch)
CREATE TABLE IF NOT EXISTS tournaments (
    tournament_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    seeding_rounds INTEGER NOT NULL DEFAULT 3,
    performance_seeding_modified INTEGER,
    subjective_modified INTEGER,
    summary_computed INTEGER
);

-- Team registry
CREATE TABLE IF NOT EXISTS teams (
    team_number INTEGER PRIMARY KEY,
    team_name TEXT NOT NULL,
    organization TEXT
);

CREATE TABLE IF NOT EXISTS tournament_teams (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    team_number INTEGER NOT NULL REFERENCES teams(team_number),
    award_group TEXT NOT NULL,
    judging_group TEXT NOT NULL,
    PRIMARY KEY (tournament, team_number)
);
CREATE INDEX IF NOT EXISTS idx_tournament_teams_award ON tournament_teams(tournament, award_group);
CREATE INDEX IF NOT EXISTS idx_tournament_teams_judging ON tournament_teams(tournament, judging_group);

CREATE TABLE IF NOT EXISTS judges (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    judge_id TEXT NOT NULL,
    category TEXT NOT NULL,
    judging_group TEXT NOT NULL,
    PRIMARY KEY (tournament, judge_id, category, judging_group)
);

-- Raw performance runs, totals computed by the score entry collaborator
CREATE TABLE IF NOT EXISTS performance (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    team_number INTEGER NOT NULL,
    run_number INTEGER NOT NULL,
    computed_total REAL,
    no_show INTEGER NOT NULL DEFAULT 0,
    bye INTEGER NOT NULL DEFAULT 0,
    verified INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tournament, team_number, run_number)
);

-- Best and average seeding-round score per team
CREATE VIEW IF NOT EXISTS performance_seeding_max AS
    SELECT p.tournament AS tournament,
           p.team_number AS team_number,
           MAX(p.computed_total) AS score,
           AVG(p.computed_total) AS average
    FROM performance p
    JOIN tournaments t ON t.tournament_id = p.tournament
    WHERE p.run_number <= t.seeding_rounds
      AND p.bye = 0
      AND p.no_show = 0
      AND p.computed_total IS NOT NULL
    GROUP BY p.tournament, p.team_number;

-- Per-judge subjective totals, produced by the per-judge computation
CREATE TABLE IF NOT EXISTS subjective_computed_scores (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    team_number INTEGER NOT NULL,
    judge TEXT NOT NULL,
    computed_total REAL,
    standardized_score REAL,
    no_show INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tournament, category, team_number, judge)
);

-- Raw per-goal subjective values, the source of virtual categories
CREATE TABLE IF NOT EXISTS subjective_goal_scores (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    team_number INTEGER NOT NULL,
    judge TEXT NOT NULL,
    goal_name TEXT NOT NULL,
    goal_value REAL,
    PRIMARY KEY (tournament, category, team_number, judge, goal_name)
);

-- Derived: per-category scores rescaled into the common range
CREATE TABLE IF NOT EXISTS final_scores (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    team_number INTEGER NOT NULL,
    final_score REAL NOT NULL,
    PRIMARY KEY (tournament, category, team_number)
);

-- Derived: weighted sum of final scores
CREATE TABLE IF NOT EXISTS overall_scores (
    tournament INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    team_number INTEGER NOT NULL,
    overall_score REAL NOT NULL,
    PRIMARY KEY (tournament, team_number)
);

-- Derived: averaged goal values feeding virtual categories
CREATE TABLE IF NOT EXISTS virtual_subjective_category (
    tournament_id INTEGER NOT NULL REFERENCES tournaments(tournament_id) ON DELETE CASCADE,
    category_name TEXT NOT NULL,
    source_category_name TEXT NOT NULL,
    goal_name TEXT NOT NULL,
    team_number INTEGER NOT NULL,
    goal_score REAL NOT NULL,
    PRIMARY KEY (tournament_id, category_name, source_category_name, goal_name, team_number)
);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Create the schema, or check that an existing one is usable
pub fn create_schema(conn: &Connection) -> Result<()> {
    let has_meta: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_meta'",
            [],
            |r| r.get::<_, i64>(0),
        )
        .map(|count| count > 0)
        .map_err(|e| ScoringError::db_operation("inspect schema", e))?;

    let current_version: Option<i64> = if has_meta {
        conn.query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok()
    } else {
        None
    };

    match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ScoringError::db_operation("create database schema", e))?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
                [CURRENT_SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| ScoringError::db_operation("record schema version", e))?;
            tracing::debug!(version = CURRENT_SCHEMA_VERSION, "Created database schema");
            Ok(())
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(v) if v > CURRENT_SCHEMA_VERSION => Err(ScoringError::Other(format!(
            "database schema version {} is newer than supported version {}",
            v, CURRENT_SCHEMA_VERSION
        ))),
        Some(v) => {
            // Every table is CREATE IF NOT EXISTS, so older stores only gain tables
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ScoringError::db_operation("upgrade database schema", e))?;
            conn.execute(
                "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
                [CURRENT_SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| ScoringError::db_operation("record schema version", e))?;
            tracing::info!(
                "Database schema updated from version {} to {}",
                v,
                CURRENT_SCHEMA_VERSION
            );
            Ok(())
        }
    }
}
