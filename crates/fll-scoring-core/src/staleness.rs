//! Staleness of the persisted summary
//!
//! Every tournament carries three stamps. The store sets them through
//! `Database::mark_performance_modified`, `Database::mark_subjective_modified`
//! and `Database::mark_summary_computed` only; this module just compares them.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The modification stamps of one tournament
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModificationState {
    /// Last add/edit/verify of a seeding-round performance score
    pub performance_seeding_modified: Option<DateTime<Utc>>,
    /// Last add/edit/delete of a subjective score
    pub subjective_modified: Option<DateTime<Utc>>,
    /// Last successful summarize-and-aggregate
    pub summary_computed: Option<DateTime<Utc>>,
}

impl ModificationState {
    /// Whether the persisted final and overall scores may be out of date.
    ///
    /// A summary stamped at the same instant as a modification counts as
    /// fresh.
    pub fn needs_recompute(&self) -> bool {
        let Some(summary) = self.summary_computed else {
            // never computed
            return true;
        };

        let stale = |modified: Option<DateTime<Utc>>| modified.is_some_and(|m| summary < m);
        stale(self.performance_seeding_modified) || stale(self.subjective_modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn state(
        perf: Option<DateTime<Utc>>,
        subj: Option<DateTime<Utc>>,
        summary: Option<DateTime<Utc>>,
    ) -> ModificationState {
        ModificationState {
            performance_seeding_modified: perf,
            subjective_modified: subj,
            summary_computed: summary,
        }
    }

    #[test]
    fn test_never_computed_needs_recompute() {
        assert!(state(None, None, None).needs_recompute());
        assert!(state(at(10), at(20), None).needs_recompute());
    }

    #[test]
    fn test_computed_and_nothing_modified() {
        assert!(!state(None, None, at(10)).needs_recompute());
    }

    #[test]
    fn test_only_subjective_modified() {
        assert!(state(None, at(20), at(10)).needs_recompute());
        assert!(!state(None, at(5), at(10)).needs_recompute());
    }

    #[test]
    fn test_only_performance_modified() {
        assert!(state(at(20), None, at(10)).needs_recompute());
        assert!(!state(at(5), None, at(10)).needs_recompute());
    }

    #[test]
    fn test_both_modified() {
        assert!(state(at(20), at(5), at(10)).needs_recompute());
        assert!(state(at(5), at(20), at(10)).needs_recompute());
        assert!(!state(at(5), at(6), at(10)).needs_recompute());
    }

    #[test]
    fn test_equal_stamps_are_fresh() {
        assert!(!state(at(10), at(10), at(10)).needs_recompute());
    }
}
