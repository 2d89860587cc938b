//! Exhaustive hyper-parameter search scored by cross-validated balanced accuracy.
use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::config::{BoostGrid, ForestGrid, TreeGrid};
use crate::dataset::stratified_k_fold;
use crate::error::{EvalError, Result};
use crate::models::factory::{build_model, ModelParams};
use crate::models::forest::ForestParams;
use crate::models::gbdt::BoostParams;
use crate::models::metrics::balanced_accuracy;
use crate::models::tree::{MaxFeatures, TreeParams};

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: ModelParams,
    pub best_score: f64,
    /// Mean fold score of every candidate, in candidate order.
    pub scores: Vec<f64>,
}

/// Mean balanced accuracy of `params` over unshuffled stratified folds.
pub fn cross_val_score(params: &ModelParams, x: &Array2<f64>, y: &[u8], folds: usize) -> Result<f64> {
    let mut total = 0.0;
    let mut used = 0usize;
    for fold in stratified_k_fold(y, folds) {
        if fold.train.is_empty() || fold.test.is_empty() {
            continue;
        }
        let x_train = x.select(Axis(0), &fold.train);
        let y_train: Vec<u8> = fold.train.iter().map(|&i| y[i]).collect();
        let x_test = x.select(Axis(0), &fold.test);
        let y_test: Vec<u8> = fold.test.iter().map(|&i| y[i]).collect();

        let mut model = build_model(params);
        model.fit(&x_train, &y_train)?;
        let predicted = model.predict(&x_test)?;
        total += balanced_accuracy(&y_test, &predicted);
        used += 1;
    }
    if used == 0 {
        return Err(EvalError::EmptyDataset);
    }
    Ok(total / used as f64)
}

/// Score every candidate and keep the first one with the highest mean score.
///
/// Candidates are scored in parallel; the winner is picked in candidate order
/// so ties resolve the same way on any thread count.
pub fn grid_search(candidates: &[ModelParams], x: &Array2<f64>, y: &[u8], folds: usize) -> Result<SearchOutcome> {
    if candidates.is_empty() {
        return Err(EvalError::EmptyGrid("no candidates".to_string()));
    }

    let scores: Vec<f64> = candidates
        .par_iter()
        .map(|params| cross_val_score(params, x, y, folds))
        .collect::<Result<Vec<f64>>>()?;

    let mut best_idx = 0;
    for (idx, &score) in scores.iter().enumerate() {
        if score > scores[best_idx] {
            best_idx = idx;
        }
    }
    log::debug!(
        "Grid search over {} candidates: best score {:.4} with {:?}",
        candidates.len(),
        scores[best_idx],
        candidates[best_idx]
    );

    Ok(SearchOutcome {
        best: candidates[best_idx].clone(),
        best_score: scores[best_idx],
        scores,
    })
}

fn tree_params(grid: &TreeGrid, max_features: MaxFeatures, seed: u64) -> Vec<TreeParams> {
    let mut params = Vec::new();
    for &max_depth in &grid.max_depth {
        for &min_samples_split in &grid.min_samples_split {
            for &min_samples_leaf in &grid.min_samples_leaf {
                for &criterion in &grid.criterion {
                    params.push(TreeParams {
                        max_depth,
                        min_samples_split,
                        min_samples_leaf,
                        criterion,
                        max_features,
                        seed,
                    });
                }
            }
        }
    }
    params
}

pub fn tree_candidates(grid: &TreeGrid, seed: u64) -> Vec<ModelParams> {
    tree_params(grid, MaxFeatures::All, seed)
        .into_iter()
        .map(ModelParams::DecisionTree)
        .collect()
}

pub fn forest_candidates(grid: &ForestGrid, seed: u64) -> Vec<ModelParams> {
    let mut candidates = Vec::new();
    for &max_features in &grid.max_features {
        for tree in tree_params(&grid.tree, max_features, seed) {
            for &n_estimators in &grid.n_estimators {
                candidates.push(ModelParams::RandomForest(ForestParams {
                    tree: tree.clone(),
                    n_estimators,
                }));
            }
        }
    }
    candidates
}

pub fn boost_candidates(grid: &BoostGrid, seed: u64) -> Vec<ModelParams> {
    let mut candidates = Vec::new();
    for &min_leaf_size in &grid.min_leaf_size {
        for &subsample in &grid.subsample {
            for &colsample in &grid.colsample {
                for &max_depth in &grid.max_depth {
                    for &learning_rate in &grid.learning_rate {
                        for &iterations in &grid.iterations {
                            candidates.push(ModelParams::GradientBoosting(BoostParams {
                                max_depth,
                                iterations,
                                learning_rate,
                                min_leaf_size,
                                subsample,
                                colsample,
                                permutation_repeats: grid.permutation_repeats,
                                seed,
                            }));
                        }
                    }
                }
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tree::SplitCriterion;

    #[test]
    fn default_grids_have_expected_sizes() {
        assert_eq!(tree_candidates(&TreeGrid::default(), 42).len(), 54);
        assert_eq!(forest_candidates(&ForestGrid::default(), 42).len(), 54 * 6);
        assert_eq!(boost_candidates(&BoostGrid::default(), 42).len(), 3 * 3 * 3 * 2 * 3);
    }

    #[test]
    fn first_best_candidate_wins_ties() {
        // Column 0 is a perfect predictor, so every depth scores 1.0.
        let n = 30;
        let x = Array2::from_shape_fn((n, 2), |(r, c)| if c == 0 { (r % 2) as f64 } else { (r % 5) as f64 });
        let y: Vec<u8> = (0..n).map(|r| (r % 2) as u8).collect();
        let grid = TreeGrid {
            max_depth: vec![Some(1), Some(2), None],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1],
            criterion: vec![SplitCriterion::Gini],
        };
        let candidates = tree_candidates(&grid, 0);
        let outcome = grid_search(&candidates, &x, &y, 3).unwrap();
        assert_eq!(outcome.scores, vec![1.0, 1.0, 1.0]);
        assert_eq!(outcome.best, candidates[0]);
    }

    #[test]
    fn empty_grid_is_an_error() {
        let x = Array2::zeros((4, 1));
        assert!(grid_search(&[], &x, &[0, 1, 0, 1], 2).is_err());
    }
}
