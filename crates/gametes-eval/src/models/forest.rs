//! Bagged ensemble of CART trees.
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::{EvalError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::tree::{DecisionTree, TreeParams};

#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    /// Per-tree settings; `seed` is the forest seed.
    pub tree: TreeParams,
    pub n_estimators: usize,
}

pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        RandomForest {
            params,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl ClassifierModel for RandomForest {
    /// Each tree sees a bootstrap sample drawn with its own seeded generator,
    /// so the fitted forest does not depend on the thread pool.
    fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<()> {
        let n = x.nrows();
        if n == 0 {
            return Err(EvalError::EmptyDataset);
        }
        if self.params.n_estimators == 0 {
            return Err(EvalError::InvalidConfig(
                "n_estimators must be positive".to_string(),
            ));
        }

        let base_seed = self.params.tree.seed;
        let tree_params = self.params.tree.clone();
        let trees: Result<Vec<DecisionTree>> = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                let samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree = DecisionTree::new(tree_params.clone());
                tree.fit_on(x, y, samples, &mut rng)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.n_features = x.ncols();
        log::trace!("Fitted forest of {} trees", self.trees.len());
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(EvalError::NotFitted(self.name().to_string()));
        }
        let mut total = vec![0.0; x.nrows()];
        for tree in &self.trees {
            for (acc, p) in total.iter_mut().zip(tree.predict_proba(x)?) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        Ok(total.into_iter().map(|p| p / n_trees).collect())
    }

    /// Mean of the per-tree normalised importances, renormalised.
    fn feature_importances(&self) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(EvalError::NotFitted(self.name().to_string()));
        }
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (acc, v) in total.iter_mut().zip(tree.feature_importances()?) {
                *acc += v;
            }
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for v in total.iter_mut() {
                *v /= sum;
            }
        }
        Ok(total)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tree::MaxFeatures;

    fn signal_data() -> (Array2<f64>, Vec<u8>) {
        // Column 1 determines the class; the others cycle independently.
        let n = 60;
        let x = Array2::from_shape_fn((n, 4), |(r, c)| match c {
            1 => (r % 2) as f64,
            _ => ((r * (c + 3)) % 7) as f64,
        });
        let y = (0..n).map(|r| (r % 2) as u8).collect();
        (x, y)
    }

    fn params(seed: u64) -> ForestParams {
        ForestParams {
            tree: TreeParams {
                max_features: MaxFeatures::Sqrt,
                seed,
                ..TreeParams::default()
            },
            n_estimators: 25,
        }
    }

    #[test]
    fn forest_finds_signal_column() {
        let (x, y) = signal_data();
        let mut forest = RandomForest::new(params(42));
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);
        let predicted = forest.predict(&x).unwrap();
        let correct = predicted.iter().zip(&y).filter(|(p, t)| p == t).count();
        assert!(correct as f64 / y.len() as f64 >= 0.9);

        let imp = forest.feature_importances().unwrap();
        let best = imp
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(best, 1, "importances: {:?}", imp);
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = signal_data();
        let mut a = RandomForest::new(params(7));
        let mut b = RandomForest::new(params(7));
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.feature_importances().unwrap(), b.feature_importances().unwrap());
    }
}
