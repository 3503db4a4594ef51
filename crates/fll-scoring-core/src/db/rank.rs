use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::config::WinnerCriteria;
use crate::error::{Result, ScoringError};
use crate::ranking::{rank_scores, CategoryRank, Grouping, Quartile, RankCategory, TeamScore};

use super::registry::team_registration;
use super::tournament::get_tournament;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub team_number: i32,
    pub team_name: String,
    pub score: Option<f64>,
    pub rank: CategoryRank,
    pub quartile: Option<Quartile>,
}

/// Ranks of every team in one award or judging group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRanking {
    pub group: String,
    pub teams: Vec<RankedTeam>,
}

struct GroupMember {
    team_number: i32,
    team_name: String,
    group: String,
    score: Option<f64>,
}

/// Registered teams with their score for the category, grouped.
///
/// A team without a score row comes back with `score: None`.
fn group_members(
    conn: &Connection,
    tournament: i64,
    category: &RankCategory,
    grouping: Grouping,
    only_group: Option<&str>,
) -> Result<Vec<GroupMember>> {
    let (score_join, score_column) = match category {
        RankCategory::Overall => (
            "LEFT JOIN overall_scores s
                 ON s.tournament = tt.tournament AND s.team_number = tt.team_number",
            "s.overall_score",
        ),
        RankCategory::Category(_) => (
            "LEFT JOIN final_scores s
                 ON s.tournament = tt.tournament AND s.team_number = tt.team_number
                 AND s.category = ?2",
            "s.final_score",
        ),
    };
    let group_column = grouping.column();
    let sql = format!(
        "SELECT tt.team_number, t.team_name, tt.{group_column}, {score_column}
         FROM tournament_teams tt
         JOIN teams t ON t.team_number = tt.team_number
         {score_join}
         WHERE tt.tournament = ?1 AND (?3 IS NULL OR tt.{group_column} = ?3)
         ORDER BY tt.{group_column}, tt.team_number"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ScoringError::db_operation("prepare rank query", e))?;
    // ?2 is only referenced for category scores, so bind by explicit index
    stmt.raw_bind_parameter(1_usize, tournament)?;
    if let RankCategory::Category(c) = category {
        stmt.raw_bind_parameter(2_usize, c.name.as_str())?;
    }
    stmt.raw_bind_parameter(3_usize, only_group)?;

    let mut rows = stmt.raw_query();
    let mut members = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| ScoringError::db_operation("read rank row", e))?
    {
        members.push(GroupMember {
            team_number: row.get(0)?,
            team_name: row.get(1)?,
            group: row.get(2)?,
            score: row.get(3)?,
        });
    }

    Ok(members)
}

fn team_score(score: Option<f64>) -> TeamScore {
    score.map(TeamScore::Scored).unwrap_or(TeamScore::NoShow)
}

impl super::Database {
    /// Rank of one team within its group.
    ///
    /// A registered team without a score in the category is a no-show.
    #[tracing::instrument(skip(self, category), fields(category = %category.name()))]
    pub fn rank_team(
        &self,
        tournament: i64,
        team_number: i32,
        category: &RankCategory,
        grouping: Grouping,
        winner: WinnerCriteria,
    ) -> Result<CategoryRank> {
        let team = team_registration(&self.conn, tournament, team_number)?;
        let group = match grouping {
            Grouping::AwardGroup => team.award_group,
            Grouping::JudgingGroup => team.judging_group,
        };

        let scores: BTreeMap<i32, TeamScore> =
            group_members(&self.conn, tournament, category, grouping, Some(&group))?
                .into_iter()
                .map(|m| (m.team_number, team_score(m.score)))
                .collect();

        let ranks = rank_scores(&scores, winner);
        Ok(ranks
            .get(&team_number)
            .copied()
            .unwrap_or(CategoryRank::NoShow))
    }

    /// Ranks of every team of the tournament, one entry per group.
    ///
    /// Within a group teams are listed best first; ties by team number, and
    /// no-shows last.
    #[tracing::instrument(skip(self, category), fields(category = %category.name()))]
    pub fn rank_category(
        &self,
        tournament: i64,
        category: &RankCategory,
        grouping: Grouping,
        winner: WinnerCriteria,
    ) -> Result<Vec<GroupRanking>> {
        get_tournament(&self.conn, tournament)?;

        let mut groups: BTreeMap<String, Vec<GroupMember>> = BTreeMap::new();
        for member in group_members(&self.conn, tournament, category, grouping, None)? {
            groups.entry(member.group.clone()).or_default().push(member);
        }

        let rankings = groups
            .into_iter()
            .map(|(group, members)| rank_group(group, members, winner))
            .collect::<Vec<_>>();

        tracing::debug!(groups = rankings.len(), "Ranked category");
        Ok(rankings)
    }
}

fn rank_group(group: String, members: Vec<GroupMember>, winner: WinnerCriteria) -> GroupRanking {
    let scores: BTreeMap<i32, TeamScore> = members
        .iter()
        .map(|m| (m.team_number, team_score(m.score)))
        .collect();
    let ranks = rank_scores(&scores, winner);

    let mut teams: Vec<RankedTeam> = members
        .into_iter()
        .map(|m| {
            let rank = ranks
                .get(&m.team_number)
                .copied()
                .unwrap_or(CategoryRank::NoShow);
            RankedTeam {
                team_number: m.team_number,
                team_name: m.team_name,
                score: m.score,
                quartile: rank.quartile(),
                rank,
            }
        })
        .collect();

    teams.sort_by_key(|t| match t.rank {
        CategoryRank::Ranked { rank, .. } => (0, rank, t.team_number),
        CategoryRank::NoShow => (1, 0, t.team_number),
    });

    GroupRanking { group, teams }
}
