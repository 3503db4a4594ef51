//! Competition ranking within a group of teams
//!
//! Scores are sorted best-first according to the tournament's
//! [`WinnerCriteria`]. Equal scores share a rank and the next distinct score
//! skips past them (10, 10, 8 ranks as 1, 1, 3). No-shows never get a
//! numeric rank and do not count toward the group size.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::category::{CategoryKind, CategoryRegistry, ScoreCategory, OVERALL_CATEGORY};
use crate::config::WinnerCriteria;

/// Rank value reported for a no-show in flat outputs
pub const NO_SHOW_RANK: i32 = -1;

/// A team's input to the ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamScore {
    Scored(f64),
    NoShow,
}

/// A team's rank in one category within one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryRank {
    Ranked { rank: u32, group_size: u32 },
    NoShow,
}

impl CategoryRank {
    /// Numeric rank, or [`NO_SHOW_RANK`]
    pub fn rank_value(&self) -> i32 {
        match self {
            CategoryRank::Ranked { rank, .. } => *rank as i32,
            CategoryRank::NoShow => NO_SHOW_RANK,
        }
    }

    pub fn quartile(&self) -> Option<Quartile> {
        match self {
            CategoryRank::Ranked { rank, group_size } => Some(Quartile::of(*rank, *group_size)),
            CategoryRank::NoShow => None,
        }
    }
}

impl fmt::Display for CategoryRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryRank::Ranked { rank, group_size } => write!(f, "{} of {}", rank, group_size),
            CategoryRank::NoShow => write!(f, "No Show"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quartile {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
}

impl Quartile {
    /// Quartile of a rank within a group; display only.
    pub fn of(rank: u32, group_size: u32) -> Quartile {
        if group_size == 0 {
            return Quartile::Fourth;
        }
        let p = f64::from(rank) / f64::from(group_size);
        if p <= 0.25 {
            Quartile::First
        } else if p <= 0.50 {
            Quartile::Second
        } else if p <= 0.75 {
            Quartile::Third
        } else {
            Quartile::Fourth
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl Serialize for Quartile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// Rank every team of one group.
///
/// A `NaN` score is treated as a no-show.
pub fn rank_scores(
    scores: &BTreeMap<i32, TeamScore>,
    winner: WinnerCriteria,
) -> BTreeMap<i32, CategoryRank> {
    let mut scored: Vec<(i32, f64)> = scores
        .iter()
        .filter_map(|(&team, score)| match score {
            TeamScore::Scored(value) if !value.is_nan() => Some((team, *value)),
            _ => None,
        })
        .collect();

    scored.sort_by(|(team_a, a), (team_b, b)| {
        let by_score = if winner.ascending_is_better() {
            a.total_cmp(b)
        } else {
            b.total_cmp(a)
        };
        by_score.then(team_a.cmp(team_b))
    });

    let group_size = scored.len() as u32;
    let mut ranks: BTreeMap<i32, CategoryRank> = scores
        .keys()
        .map(|&team| (team, CategoryRank::NoShow))
        .collect();

    let mut rank = 0u32;
    let mut previous: Option<f64> = None;
    for (position, (team, score)) in scored.into_iter().enumerate() {
        if previous != Some(score) {
            rank = position as u32 + 1;
        }
        previous = Some(score);
        ranks.insert(team, CategoryRank::Ranked { rank, group_size });
    }

    ranks
}

/// Which group of teams a rank is computed within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    AwardGroup,
    JudgingGroup,
}

impl Grouping {
    /// Award group for performance, virtual and overall; judging group for
    /// ordinary subjective categories, whose judges only see one group.
    pub fn default_for(category: &RankCategory) -> Grouping {
        match category {
            RankCategory::Category(c) if matches!(c.kind, CategoryKind::Subjective { .. }) => {
                Grouping::JudgingGroup
            }
            _ => Grouping::AwardGroup,
        }
    }

    /// Column of `tournament_teams` holding the group
    pub(crate) fn column(self) -> &'static str {
        match self {
            Grouping::AwardGroup => "award_group",
            Grouping::JudgingGroup => "judging_group",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::AwardGroup => write!(f, "award group"),
            Grouping::JudgingGroup => write!(f, "judging group"),
        }
    }
}

/// What a rank is computed over: one category's final scores, or the
/// overall score
#[derive(Debug, Clone, PartialEq)]
pub enum RankCategory {
    Overall,
    Category(ScoreCategory),
}

impl RankCategory {
    /// Resolve a category name; `overall` names the overall score
    pub fn resolve(name: &str, registry: &CategoryRegistry) -> crate::error::Result<RankCategory> {
        if name == OVERALL_CATEGORY {
            return Ok(RankCategory::Overall);
        }
        Ok(RankCategory::Category(registry.require(name)?.clone()))
    }

    pub fn name(&self) -> &str {
        match self {
            RankCategory::Overall => OVERALL_CATEGORY,
            RankCategory::Category(c) => &c.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[(i32, Option<f64>)]) -> BTreeMap<i32, TeamScore> {
        values
            .iter()
            .map(|&(team, score)| {
                (
                    team,
                    score.map(TeamScore::Scored).unwrap_or(TeamScore::NoShow),
                )
            })
            .collect()
    }

    fn rank_of(ranks: &BTreeMap<i32, CategoryRank>, team: i32) -> i32 {
        ranks[&team].rank_value()
    }

    #[test]
    fn test_ties_share_rank_and_leave_gap() {
        let ranks = rank_scores(
            &scores(&[(1, Some(10.0)), (2, Some(10.0)), (3, Some(8.0))]),
            WinnerCriteria::High,
        );
        assert_eq!(rank_of(&ranks, 1), 1);
        assert_eq!(rank_of(&ranks, 2), 1);
        assert_eq!(rank_of(&ranks, 3), 3);
    }

    #[test]
    fn test_all_equal_scores() {
        let ranks = rank_scores(
            &scores(&[(1, Some(5.0)), (2, Some(5.0)), (3, Some(5.0))]),
            WinnerCriteria::High,
        );
        assert!(ranks.values().all(|r| r.rank_value() == 1));
    }

    #[test]
    fn test_low_score_wins() {
        let ranks = rank_scores(
            &scores(&[(1, Some(30.0)), (2, Some(10.0)), (3, Some(20.0))]),
            WinnerCriteria::Low,
        );
        assert_eq!(rank_of(&ranks, 2), 1);
        assert_eq!(rank_of(&ranks, 3), 2);
        assert_eq!(rank_of(&ranks, 1), 3);
    }

    #[test]
    fn test_no_show_excluded_from_group_size() {
        let ranks = rank_scores(
            &scores(&[(1, Some(10.0)), (2, None), (3, Some(4.0))]),
            WinnerCriteria::High,
        );
        assert_eq!(ranks[&2], CategoryRank::NoShow);
        assert_eq!(rank_of(&ranks, 2), NO_SHOW_RANK);
        assert_eq!(
            ranks[&3],
            CategoryRank::Ranked {
                rank: 2,
                group_size: 2
            }
        );
    }

    #[test]
    fn test_nan_is_a_no_show() {
        let ranks = rank_scores(
            &scores(&[(1, Some(f64::NAN)), (2, Some(1.0))]),
            WinnerCriteria::High,
        );
        assert_eq!(ranks[&1], CategoryRank::NoShow);
        assert_eq!(
            ranks[&2],
            CategoryRank::Ranked {
                rank: 1,
                group_size: 1
            }
        );
    }

    #[test]
    fn test_empty_group() {
        let ranks = rank_scores(&BTreeMap::new(), WinnerCriteria::High);
        assert!(ranks.is_empty());
    }

    #[test]
    fn test_quartile_boundaries() {
        assert_eq!(Quartile::of(1, 4), Quartile::First);
        assert_eq!(Quartile::of(2, 4), Quartile::Second);
        assert_eq!(Quartile::of(3, 4), Quartile::Third);
        assert_eq!(Quartile::of(4, 4), Quartile::Fourth);
        assert_eq!(Quartile::of(1, 1), Quartile::Fourth);
        assert_eq!(Quartile::of(1, 3), Quartile::Second);
    }

    #[test]
    fn test_default_grouping_follows_category_kind() {
        let subjective = ScoreCategory {
            name: "project".to_string(),
            title: "Project".to_string(),
            weight: 1.0,
            max_score: 40.0,
            kind: CategoryKind::Subjective { goals: Vec::new() },
        };
        let performance = ScoreCategory {
            name: "performance".to_string(),
            title: "Performance".to_string(),
            weight: 1.0,
            max_score: 400.0,
            kind: CategoryKind::Performance { min_score: 0.0 },
        };

        assert_eq!(
            Grouping::default_for(&RankCategory::Category(subjective)),
            Grouping::JudgingGroup
        );
        assert_eq!(
            Grouping::default_for(&RankCategory::Category(performance)),
            Grouping::AwardGroup
        );
        assert_eq!(
            Grouping::default_for(&RankCategory::Overall),
            Grouping::AwardGroup
        );
    }

    #[test]
    fn test_no_show_has_no_quartile() {
        assert_eq!(CategoryRank::NoShow.quartile(), None);
        assert_eq!(CategoryRank::NoShow.to_string(), "No Show");
    }
}
