//! CART classification tree.
//!
//! Splits are axis-aligned thresholds chosen greedily by impurity decrease.
//! Any split that leaves `min_samples_leaf` rows on each side is admissible,
//! including one with zero gain, so interactions without marginal effects can
//! still be reached at deeper levels.
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::models::classifier_trait::ClassifierModel;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SplitCriterion {
    Gini,
    Entropy,
}

impl SplitCriterion {
    fn impurity(self, counts: [usize; 2]) -> f64 {
        let n = (counts[0] + counts[1]) as f64;
        if n == 0.0 {
            return 0.0;
        }
        let p = [counts[0] as f64 / n, counts[1] as f64 / n];
        match self {
            SplitCriterion::Gini => 1.0 - p[0] * p[0] - p[1] * p[1],
            SplitCriterion::Entropy => p
                .iter()
                .filter(|&&q| q > 0.0)
                .map(|&q| -q * q.log2())
                .sum(),
        }
    }
}

/// Number of features examined at each split.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Log2,
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features as f64;
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => n.sqrt().floor() as usize,
            MaxFeatures::Log2 => n.log2().floor() as usize,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: SplitCriterion,
    pub max_features: MaxFeatures,
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: SplitCriterion::Gini,
            max_features: MaxFeatures::All,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

struct Candidate {
    feature: usize,
    threshold: f64,
    // n_left * impurity(left) + n_right * impurity(right)
    children: f64,
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new(params: TreeParams) -> Self {
        DecisionTree {
            params,
            nodes: Vec::new(),
            importances: Vec::new(),
        }
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Fit on the rows listed in `samples` (repeats act as weights).
    pub fn fit_on(&mut self, x: &Array2<f64>, y: &[u8], samples: Vec<usize>, rng: &mut StdRng) -> Result<()> {
        if samples.is_empty() {
            return Err(EvalError::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(EvalError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        self.nodes.clear();
        self.importances = vec![0.0; x.ncols()];
        self.grow(x, y, samples, 0, rng);

        let total: f64 = self.importances.iter().sum();
        if total > 0.0 {
            for v in self.importances.iter_mut() {
                *v /= total;
            }
        }
        Ok(())
    }

    fn grow(&mut self, x: &Array2<f64>, y: &[u8], samples: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = count_classes(y, &samples);
        let n = samples.len();
        let proba = counts[1] as f64 / n as f64;
        let impurity = self.params.criterion.impurity(counts);

        let splittable = impurity > 0.0
            && n >= self.params.min_samples_split
            && n >= 2 * self.params.min_samples_leaf
            && self.params.max_depth.map_or(true, |d| depth < d);

        if splittable {
            if let Some(split) = self.best_split(x, y, &samples, rng) {
                self.importances[split.feature] += n as f64 * impurity - split.children;

                let idx = self.nodes.len();
                self.nodes.push(Node::Leaf { proba });
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .into_iter()
                    .partition(|&s| x[[s, split.feature]] <= split.threshold);
                let left = self.grow(x, y, left, depth + 1, rng);
                let right = self.grow(x, y, right, depth + 1, rng);
                self.nodes[idx] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                return idx;
            }
        }

        self.nodes.push(Node::Leaf { proba });
        self.nodes.len() - 1
    }

    fn best_split(&self, x: &Array2<f64>, y: &[u8], samples: &[usize], rng: &mut StdRng) -> Option<Candidate> {
        let n_features = x.ncols();
        let max_features = self.params.max_features.resolve(n_features);
        let mut features: Vec<usize> = (0..n_features).collect();
        if max_features < n_features {
            features.shuffle(rng);
        }

        let min_leaf = self.params.min_samples_leaf.max(1);
        let total = count_classes(y, samples);
        let mut best: Option<Candidate> = None;
        let mut visited = 0;

        for feature in features {
            // Keep drawing past the budget until one admissible split exists.
            if visited >= max_features && best.is_some() {
                break;
            }

            let mut column: Vec<(f64, u8)> = samples.iter().map(|&s| (x[[s, feature]], y[s])).collect();
            column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            if column.first().map(|c| c.0) == column.last().map(|c| c.0) {
                continue;
            }
            visited += 1;

            let n = column.len();
            let mut left = [0usize; 2];
            for i in 0..n - 1 {
                left[usize::from(column[i].1 == 1)] += 1;
                let n_left = i + 1;
                if n_left < min_leaf || n - n_left < min_leaf {
                    continue;
                }
                let (lo, hi) = (column[i].0, column[i + 1].0);
                if lo == hi {
                    continue;
                }
                let right = [total[0] - left[0], total[1] - left[1]];
                let children = n_left as f64 * self.params.criterion.impurity(left)
                    + (n - n_left) as f64 * self.params.criterion.impurity(right);

                if best.as_ref().map_or(true, |b| children < b.children) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Candidate {
                        feature,
                        threshold,
                        children,
                    });
                }
            }
        }
        best
    }

    fn proba_row(&self, row: ndarray::ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn count_classes(y: &[u8], samples: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &s in samples {
        counts[usize::from(y[s] == 1)] += 1;
    }
    counts
}

impl ClassifierModel for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.fit_on(x, y, (0..x.nrows()).collect(), &mut rng)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(EvalError::NotFitted(self.name().to_string()));
        }
        if x.ncols() != self.importances.len() {
            return Err(EvalError::DimensionMismatch {
                expected: self.importances.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.rows().into_iter().map(|row| self.proba_row(row)).collect())
    }

    /// Mean decrease in impurity, normalised to sum to one.
    fn feature_importances(&self) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(EvalError::NotFitted(self.name().to_string()));
        }
        Ok(self.importances.clone())
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}
