use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

use super::tournament::get_tournament;

/// A team as registered for one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentTeam {
    pub team_number: i32,
    pub team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Group teams compete in for awards
    pub award_group: String,
    /// Group of teams seen by the same judges
    pub judging_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeAssignment {
    pub judge_id: String,
    pub category: String,
    pub judging_group: String,
}

pub(super) fn team_registration(
    conn: &Connection,
    tournament: i64,
    team_number: i32,
) -> Result<TournamentTeam> {
    conn.query_row(
        "SELECT tt.team_number, t.team_name, t.organization, tt.award_group, tt.judging_group
         FROM tournament_teams tt
         JOIN teams t ON t.team_number = tt.team_number
         WHERE tt.tournament = ?1 AND tt.team_number = ?2",
        params![tournament, team_number],
        team_from_row,
    )
    .optional()
    .map_err(|e| ScoringError::db_operation("read team registration", e))?
    .ok_or(ScoringError::TeamNotFound {
        tournament,
        team: team_number,
    })
}

pub(super) fn team_from_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentTeam> {
    Ok(TournamentTeam {
        team_number: row.get(0)?,
        team_name: row.get(1)?,
        organization: row.get(2)?,
        award_group: row.get(3)?,
        judging_group: row.get(4)?,
    })
}

impl super::Database {
    /// Register a team for a tournament, replacing an earlier registration
    pub fn register_team(&self, tournament: i64, team: &TournamentTeam) -> Result<()> {
        if team.award_group.trim().is_empty() {
            crate::bail_invalid!("award group", format!("team {}", team.team_number));
        }
        if team.judging_group.trim().is_empty() {
            crate::bail_invalid!("judging group", format!("team {}", team.team_number));
        }

        let tx = self.begin_write("register team")?;
        get_tournament(&tx, tournament)?;

        tx.execute(
            "INSERT INTO teams (team_number, team_name, organization) VALUES (?1, ?2, ?3)
             ON CONFLICT(team_number) DO UPDATE SET
                 team_name = excluded.team_name,
                 organization = excluded.organization",
            params![team.team_number, team.team_name, team.organization],
        )
        .map_err(|e| ScoringError::db_operation("insert team", e))?;

        tx.execute(
            "INSERT OR REPLACE INTO tournament_teams (tournament, team_number, award_group, judging_group)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                tournament,
                team.team_number,
                team.award_group,
                team.judging_group
            ],
        )
        .map_err(|e| ScoringError::db_operation("register team", e))?;

        tx.commit()
            .map_err(|e| ScoringError::transaction("commit team registration", e))?;

        tracing::debug!(tournament, team = team.team_number, "Registered team");
        Ok(())
    }

    pub fn team_registration(&self, tournament: i64, team_number: i32) -> Result<TournamentTeam> {
        team_registration(&self.conn, tournament, team_number)
    }

    /// All teams of a tournament ordered by team number
    pub fn tournament_teams(&self, tournament: i64) -> Result<Vec<TournamentTeam>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT tt.team_number, t.team_name, t.organization, tt.award_group, tt.judging_group
                 FROM tournament_teams tt
                 JOIN teams t ON t.team_number = tt.team_number
                 WHERE tt.tournament = ?1
                 ORDER BY tt.team_number",
            )
            .map_err(|e| ScoringError::db_operation("prepare team list", e))?;

        let teams = stmt
            .query_map(params![tournament], team_from_row)
            .map_err(|e| ScoringError::db_operation("list teams", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ScoringError::db_operation("read team", e))?;

        Ok(teams)
    }

    pub fn assign_judge(&self, tournament: i64, assignment: &JudgeAssignment) -> Result<()> {
        if assignment.judge_id.trim().is_empty() {
            crate::bail_invalid!("judge id", "(empty)");
        }

        let tx = self.begin_write("assign judge")?;
        get_tournament(&tx, tournament)?;
        tx.execute(
            "INSERT OR IGNORE INTO judges (tournament, judge_id, category, judging_group)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                tournament,
                assignment.judge_id,
                assignment.category,
                assignment.judging_group
            ],
        )
        .map_err(|e| ScoringError::db_operation("assign judge", e))?;
        tx.commit()
            .map_err(|e| ScoringError::transaction("commit judge assignment", e))?;

        Ok(())
    }

    /// Judge assignments ordered by group, category and judge
    pub fn judges(&self, tournament: i64) -> Result<Vec<JudgeAssignment>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT judge_id, category, judging_group FROM judges
                 WHERE tournament = ?1
                 ORDER BY judging_group, category, judge_id",
            )
            .map_err(|e| ScoringError::db_operation("prepare judge list", e))?;

        let judges = stmt
            .query_map(params![tournament], |row| {
                Ok(JudgeAssignment {
                    judge_id: row.get(0)?,
                    category: row.get(1)?,
                    judging_group: row.get(2)?,
                })
            })
            .map_err(|e| ScoringError::db_operation("list judges", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ScoringError::db_operation("read judge", e))?;

        Ok(judges)
    }
}
