//! Feature rankings built from per-feature scores.
use std::cmp::Ordering;

use crate::error::Result;
use crate::oracle::{self, DatasetType};

/// Whether small (p-values) or large (information, importance) scores win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    LowerIsBetter,
    HigherIsBetter,
}

/// Features ordered best-first.
///
/// Scores are sorted ascending with a stable sort, so equal scores keep column
/// order. For `LowerIsBetter` the best feature is the head of that order, for
/// `HigherIsBetter` it is the tail, which hands ties to the later column.
#[derive(Debug, Clone)]
pub struct FeatureRanking {
    entries: Vec<(String, f64)>,
    direction: ScoreDirection,
}

impl FeatureRanking {
    pub fn new(names: &[String], scores: &[f64], direction: ScoreDirection) -> Self {
        debug_assert_eq!(names.len(), scores.len());

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| ascending_with_nan(scores[a], scores[b], direction));
        if direction == ScoreDirection::HigherIsBetter {
            order.reverse();
        }

        let entries = order
            .into_iter()
            .map(|idx| (names[idx].clone(), scores[idx]))
            .collect();

        FeatureRanking { entries, direction }
    }

    pub fn direction(&self) -> ScoreDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best `k` feature names, best first.
    pub fn top(&self, k: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(k)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn best(&self) -> Option<&str> {
        self.entries.first().map(|(name, _)| name.as_str())
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, score)| *score)
    }

    /// Position (0 = best) of `name` in the ranking.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(candidate, _)| candidate == name)
    }

    /// Apply the ground-truth rule to the head of this ranking.
    pub fn recovers(&self, dataset_type: DatasetType) -> Result<bool> {
        let needed = dataset_type.ground_truth().len();
        oracle::recovered(&self.top(needed)[..], dataset_type)
    }
}

// NaN never wins: it sorts last when lower is better and first otherwise.
fn ascending_with_nan(a: f64, b: f64, direction: ScoreDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => match direction {
            ScoreDirection::LowerIsBetter => Ordering::Greater,
            ScoreDirection::HigherIsBetter => Ordering::Less,
        },
        (false, true) => match direction {
            ScoreDirection::LowerIsBetter => Ordering::Less,
            ScoreDirection::HigherIsBetter => Ordering::Greater,
        },
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Indices of the two largest values, best first.
///
/// Uses a stable ascending argsort and takes the last two entries, so among
/// equal importances the higher column index is preferred.
pub fn top_two_by_importance(importances: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..importances.len()).collect();
    order.sort_by(|&a, &b| {
        ascending_with_nan(importances[a], importances[b], ScoreDirection::HigherIsBetter)
    });
    order.iter().rev().take(2).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn p_values_rank_ascending() {
        let ranking = FeatureRanking::new(
            &names(&["N0", "M0P0", "M1P0", "N1"]),
            &[0.4, 1e-6, 0.01, 0.9],
            ScoreDirection::LowerIsBetter,
        );
        assert_eq!(ranking.top(2), vec!["M0P0", "M1P0"]);
        assert!(ranking.recovers(DatasetType::M1M2Additive).unwrap());
        assert!(ranking.recovers(DatasetType::M1).unwrap());
    }

    #[test]
    fn importances_rank_descending_with_late_ties() {
        let ranking = FeatureRanking::new(
            &names(&["A", "B", "C"]),
            &[0.5, 0.5, 0.1],
            ScoreDirection::HigherIsBetter,
        );
        assert_eq!(ranking.best(), Some("B"));
        assert_eq!(ranking.position("A"), Some(1));
    }

    #[test]
    fn nan_scores_never_lead() {
        let ranking = FeatureRanking::new(
            &names(&["A", "B"]),
            &[f64::NAN, 0.3],
            ScoreDirection::LowerIsBetter,
        );
        assert_eq!(ranking.best(), Some("B"));

        let ranking = FeatureRanking::new(
            &names(&["A", "B"]),
            &[0.3, f64::NAN],
            ScoreDirection::HigherIsBetter,
        );
        assert_eq!(ranking.best(), Some("A"));
    }

    #[test]
    fn top_two_prefers_later_index_on_ties() {
        assert_eq!(top_two_by_importance(&[0.0, 0.0, 1.0, 0.0]), vec![2, 3]);
        assert_eq!(top_two_by_importance(&[0.2, 0.7, 0.1]), vec![1, 0]);
        assert_eq!(top_two_by_importance(&[0.9]), vec![0]);
    }
}
