//! Typed category registry
//!
//! A [`CategoryRegistry`] is built once from a [`ChallengeConfig`] and is the
//! only place the engine learns what a category name means. Everything
//! downstream dispatches on [`CategoryKind`] rather than on strings.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::bail_challenge;
use crate::config::{
    ChallengeConfig, PerformanceConfig, SeedingScore, SubjectiveConfig, VirtualSubjectiveConfig,
    WinnerCriteria,
};
use crate::error::{Result, ScoringError};

/// Reserved name of the performance category in the store
pub const PERFORMANCE_CATEGORY: &str = "performance";

/// Reserved name used by reports for the overall score
pub const OVERALL_CATEGORY: &str = "overall";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub name: String,
    pub title: String,
    pub min: f64,
    pub max: f64,
}

/// A reference from a virtual category to a goal of a subjective category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRef {
    pub category: String,
    pub goal: String,
    /// Maximum value of the referenced goal
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryKind {
    Performance { min_score: f64 },
    Subjective { goals: Vec<Goal> },
    VirtualSubjective { goal_refs: Vec<GoalRef> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCategory {
    pub name: String,
    pub title: String,
    pub weight: f64,
    pub max_score: f64,
    #[serde(flatten)]
    pub kind: CategoryKind,
}

impl ScoreCategory {
    pub fn is_performance(&self) -> bool {
        matches!(self.kind, CategoryKind::Performance { .. })
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, CategoryKind::VirtualSubjective { .. })
    }

    pub fn goal(&self, name: &str) -> Option<&Goal> {
        match &self.kind {
            CategoryKind::Subjective { goals } => goals.iter().find(|g| g.name == name),
            _ => None,
        }
    }
}

/// Category weights used by the overall score aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryWeights(BTreeMap<String, f64>);

impl CategoryWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, weight: f64) {
        self.0.insert(category.into(), weight);
    }

    pub fn weight(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Weight of a category that takes part in the overall score.
    ///
    /// Unknown categories and zero weights yield `None`.
    pub fn contributing(&self, category: &str) -> Option<f64> {
        self.weight(category).filter(|w| *w > 0.0)
    }
}

/// All categories of a challenge, resolved and validated
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    title: String,
    winner_criteria: WinnerCriteria,
    seeding_score: SeedingScore,
    max_score_range: f64,
    categories: Vec<ScoreCategory>,
    index: BTreeMap<String, usize>,
}

impl CategoryRegistry {
    /// Load and validate a challenge description file
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_config(&ChallengeConfig::load(path)?)
    }

    pub fn from_config(config: &ChallengeConfig) -> Result<Self> {
        let mut categories = Vec::with_capacity(
            1 + config.subjective.len() + config.virtual_subjective.len(),
        );

        categories.push(performance_category(&config.performance)?);
        for subjective in &config.subjective {
            categories.push(subjective_category(subjective)?);
        }

        let subjective_count = categories.len();
        for virtual_cat in &config.virtual_subjective {
            let category = virtual_category(virtual_cat, &categories[..subjective_count])?;
            categories.push(category);
        }

        let mut index = BTreeMap::new();
        for (i, category) in categories.iter().enumerate() {
            if index.insert(category.name.clone(), i).is_some() {
                bail_challenge!("duplicate category name {}", category.name);
            }
        }

        // Virtual categories do not widen the common range
        let max_score_range = categories[..subjective_count]
            .iter()
            .map(|c| c.max_score)
            .fold(0.0_f64, f64::max);

        Ok(Self {
            title: config.title.clone(),
            winner_criteria: config.winner_criteria,
            seeding_score: config.seeding_score,
            max_score_range,
            categories,
            index,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn winner_criteria(&self) -> WinnerCriteria {
        self.winner_criteria
    }

    pub fn seeding_score(&self) -> SeedingScore {
        self.seeding_score
    }

    /// The common range every final score is rescaled into
    pub fn max_score_range(&self) -> f64 {
        self.max_score_range
    }

    pub fn get(&self, name: &str) -> Option<&ScoreCategory> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    pub fn require(&self, name: &str) -> Result<&ScoreCategory> {
        self.get(name)
            .ok_or_else(|| ScoringError::UnknownCategory(name.to_string()))
    }

    pub fn performance(&self) -> &ScoreCategory {
        &self.categories[0]
    }

    /// Ordinary subjective categories, in challenge order
    pub fn subjective(&self) -> impl Iterator<Item = &ScoreCategory> {
        self.categories
            .iter()
            .filter(|c| matches!(c.kind, CategoryKind::Subjective { .. }))
    }

    pub fn virtual_subjective(&self) -> impl Iterator<Item = &ScoreCategory> {
        self.categories.iter().filter(|c| c.is_virtual())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreCategory> {
        self.categories.iter()
    }

    pub fn weights(&self) -> CategoryWeights {
        let mut weights = CategoryWeights::new();
        for category in &self.categories {
            weights.insert(category.name.clone(), category.weight);
        }
        weights
    }
}

fn performance_category(perf: &PerformanceConfig) -> Result<ScoreCategory> {
    check_weight(PERFORMANCE_CATEGORY, perf.weight)?;
    if !perf.max_score.is_finite() || !perf.min_score.is_finite() {
        bail_challenge!("performance score range must be finite");
    }
    if perf.max_score <= 0.0 || perf.max_score <= perf.min_score {
        bail_challenge!(
            "performance max_score {} must be positive and above min_score {}",
            perf.max_score,
            perf.min_score
        );
    }
    Ok(ScoreCategory {
        name: PERFORMANCE_CATEGORY.to_string(),
        title: perf.title.clone(),
        weight: perf.weight,
        max_score: perf.max_score,
        kind: CategoryKind::Performance {
            min_score: perf.min_score,
        },
    })
}

fn subjective_category(subjective: &SubjectiveConfig) -> Result<ScoreCategory> {
    check_name(&subjective.name)?;
    check_weight(&subjective.name, subjective.weight)?;

    let mut goals = Vec::with_capacity(subjective.goals.len());
    let mut seen = HashSet::new();
    for goal in &subjective.goals {
        if !seen.insert(goal.name.as_str()) {
            bail_challenge!("duplicate goal {} in {}", goal.name, subjective.name);
        }
        if !goal.max.is_finite() || !goal.min.is_finite() || goal.max <= goal.min {
            bail_challenge!(
                "goal {}.{} has an invalid range {}..{}",
                subjective.name,
                goal.name,
                goal.min,
                goal.max
            );
        }
        goals.push(Goal {
            name: goal.name.clone(),
            title: goal.title.clone().unwrap_or_else(|| goal.name.clone()),
            min: goal.min,
            max: goal.max,
        });
    }

    let max_score: f64 = goals.iter().map(|g| g.max).sum();
    if max_score <= 0.0 {
        bail_challenge!("subjective category {} has no positive maximum", subjective.name);
    }

    Ok(ScoreCategory {
        name: subjective.name.clone(),
        title: subjective
            .title
            .clone()
            .unwrap_or_else(|| subjective.name.clone()),
        weight: subjective.weight,
        max_score,
        kind: CategoryKind::Subjective { goals },
    })
}

/// `sources` holds the already resolved performance and subjective categories
fn virtual_category(
    virtual_cat: &VirtualSubjectiveConfig,
    sources: &[ScoreCategory],
) -> Result<ScoreCategory> {
    check_name(&virtual_cat.name)?;
    check_weight(&virtual_cat.name, virtual_cat.weight)?;
    if virtual_cat.goal_refs.is_empty() {
        bail_challenge!("virtual category {} references no goals", virtual_cat.name);
    }

    let mut goal_refs = Vec::with_capacity(virtual_cat.goal_refs.len());
    let mut seen = HashSet::new();
    for goal_ref in &virtual_cat.goal_refs {
        if !seen.insert((goal_ref.category.as_str(), goal_ref.goal.as_str())) {
            bail_challenge!(
                "duplicate goal reference {}.{} in {}",
                goal_ref.category,
                goal_ref.goal,
                virtual_cat.name
            );
        }
        let source = sources
            .iter()
            .find(|c| c.name == goal_ref.category && !c.is_performance())
            .ok_or_else(|| {
                ScoringError::invalid_challenge(format!(
                    "virtual category {} references unknown subjective category {}",
                    virtual_cat.name, goal_ref.category
                ))
            })?;
        let goal = source.goal(&goal_ref.goal).ok_or_else(|| {
            ScoringError::invalid_challenge(format!(
                "virtual category {} references unknown goal {}.{}",
                virtual_cat.name, goal_ref.category, goal_ref.goal
            ))
        })?;
        goal_refs.push(GoalRef {
            category: source.name.clone(),
            goal: goal.name.clone(),
            max: goal.max,
        });
    }

    let max_score: f64 = goal_refs.iter().map(|r| r.max).sum();
    if max_score <= 0.0 {
        bail_challenge!("virtual category {} has no positive maximum", virtual_cat.name);
    }

    Ok(ScoreCategory {
        name: virtual_cat.name.clone(),
        title: virtual_cat
            .title
            .clone()
            .unwrap_or_else(|| virtual_cat.name.clone()),
        weight: virtual_cat.weight,
        max_score,
        kind: CategoryKind::VirtualSubjective { goal_refs },
    })
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail_challenge!("category names must not be empty");
    }
    if name == PERFORMANCE_CATEGORY || name == OVERALL_CATEGORY {
        bail_challenge!("category name {} is reserved", name);
    }
    Ok(())
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        bail_challenge!("weight of {} must be a non-negative number, got {}", name, weight);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHALLENGE: &str = r#"
winner_criteria = "high"

[performance]
max_score = 400
weight = 1.0

[[subjective]]
name = "project"
weight = 1.0
goals = [
  { name = "research", max = 20 },
  { name = "innovation", max = 20 },
]

[[subjective]]
name = "teamwork"
weight = 0.0
goals = [{ name = "communication", max = 10 }]

[[virtual_subjective]]
name = "core_values"
weight = 0.5
goal_refs = [
  { category = "project", goal = "innovation" },
  { category = "teamwork", goal = "communication" },
]
"#;

    fn registry(content: &str) -> Result<CategoryRegistry> {
        CategoryRegistry::from_config(&ChallengeConfig::parse(content).unwrap())
    }

    #[test]
    fn test_registry_resolves_kinds_and_maximums() {
        let registry = registry(CHALLENGE).unwrap();

        assert!(registry.performance().is_performance());
        assert_eq!(registry.subjective().count(), 2);
        assert_eq!(registry.virtual_subjective().count(), 1);

        assert_eq!(registry.require("project").unwrap().max_score, 40.0);
        assert_eq!(registry.require("core_values").unwrap().max_score, 30.0);
        assert_eq!(registry.max_score_range(), 400.0);
    }

    #[test]
    fn test_weights_exclude_zero_from_contribution() {
        let weights = registry(CHALLENGE).unwrap().weights();
        assert_eq!(weights.weight("teamwork"), Some(0.0));
        assert_eq!(weights.contributing("teamwork"), None);
        assert_eq!(weights.contributing("core_values"), Some(0.5));
        assert_eq!(weights.contributing("unknown"), None);
    }

    #[test]
    fn test_negative_weight_is_fatal() {
        let content = CHALLENGE.replace("weight = 0.5", "weight = -0.5");
        let err = registry(&content).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidChallenge { .. }));
    }

    #[test]
    fn test_nan_weight_is_fatal() {
        let content = CHALLENGE.replace("weight = 0.5", "weight = nan");
        assert!(registry(&content).is_err());
    }

    #[test]
    fn test_virtual_ref_to_unknown_goal_is_fatal() {
        let content = CHALLENGE.replace(
            "{ category = \"project\", goal = \"innovation\" }",
            "{ category = \"project\", goal = \"missing\" }",
        );
        let err = registry(&content).unwrap_err();
        assert!(err.to_string().contains("project.missing"));
    }

    #[test]
    fn test_duplicate_virtual_ref_is_fatal() {
        let content = CHALLENGE.replace(
            "{ category = \"teamwork\", goal = \"communication\" },",
            "{ category = \"teamwork\", goal = \"communication\" },\n  { category = \"teamwork\", goal = \"communication\" },",
        );
        let err = registry(&content).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidChallenge { .. }));
        assert!(err.to_string().contains("teamwork.communication"));
    }

    #[test]
    fn test_duplicate_category_is_fatal() {
        let content = CHALLENGE.replace("name = \"teamwork\"", "name = \"project\"");
        assert!(registry(&content).is_err());
    }

    #[test]
    fn test_reserved_names_are_rejected() {
        let content = CHALLENGE.replace("name = \"core_values\"", "name = \"overall\"");
        assert!(registry(&content).is_err());
    }

    #[test]
    fn test_unknown_category_lookup() {
        let registry = registry(CHALLENGE).unwrap();
        assert!(matches!(
            registry.require("robot_design"),
            Err(ScoringError::UnknownCategory(_))
        ));
    }
}
