//! Relief-family feature weights.
//!
//! Both estimators reward features that differ between an instance and its
//! nearest neighbours of the other class (misses) and penalise features that
//! differ between an instance and its nearest neighbours of the same class
//! (hits). Weights lie in [-1, 1]; a feature that alone separates the classes
//! scores 1.
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::config::ReliefConfig;

/// Per-feature scaling used by the diff function.
struct FeatureKinds {
    discrete: Vec<bool>,
    range: Vec<f64>,
}

impl FeatureKinds {
    fn from_data(x: &Array2<f64>, discrete_threshold: usize) -> Self {
        let mut discrete = Vec::with_capacity(x.ncols());
        let mut range = Vec::with_capacity(x.ncols());
        for col in x.axis_iter(Axis(1)) {
            let mut values: Vec<f64> = col.to_vec();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();
            discrete.push(values.len() <= discrete_threshold);
            let span = match (values.first(), values.last()) {
                (Some(lo), Some(hi)) => hi - lo,
                _ => 0.0,
            };
            range.push(span);
        }
        FeatureKinds { discrete, range }
    }

    fn diff(&self, feature: usize, a: f64, b: f64) -> f64 {
        if self.discrete[feature] {
            if a == b {
                0.0
            } else {
                1.0
            }
        } else if self.range[feature] > 0.0 {
            (a - b).abs() / self.range[feature]
        } else {
            0.0
        }
    }

    fn distance(&self, x: &Array2<f64>, i: usize, j: usize) -> f64 {
        let a = x.row(i);
        let b = x.row(j);
        (0..x.ncols()).map(|f| self.diff(f, a[f], b[f])).sum()
    }
}

/// Add `scale * diff(i, j)` for every feature into `acc`.
fn accumulate(acc: &mut Array1<f64>, kinds: &FeatureKinds, x: &Array2<f64>, i: usize, j: usize, scale: f64) {
    let a = x.row(i);
    let b = x.row(j);
    for f in 0..x.ncols() {
        acc[f] += scale * kinds.diff(f, a[f], b[f]);
    }
}

/// Sum per-instance contributions in instance order so results do not depend
/// on thread scheduling.
fn combine(contributions: Vec<Array1<f64>>, n_features: usize, n_samples: usize) -> Array1<f64> {
    let mut weights = Array1::zeros(n_features);
    for c in contributions {
        weights += &c;
    }
    if n_samples > 0 {
        weights /= n_samples as f64;
    }
    weights
}

/// ReliefF weights using the `n_neighbors` nearest hits and misses per instance.
///
/// The neighbour count is capped per class by the number of candidates.
pub fn relief_f(x: &Array2<f64>, y: &[u8], config: &ReliefConfig) -> Array1<f64> {
    let n = x.nrows();
    let kinds = FeatureKinds::from_data(x, config.discrete_threshold);

    let contributions: Vec<Array1<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut others: Vec<(f64, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (kinds.distance(x, i, j), j))
                .collect();
            // Stable on index for equal distances.
            others.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });

            let hits: Vec<usize> = others
                .iter()
                .filter(|(_, j)| y[*j] == y[i])
                .take(config.n_neighbors)
                .map(|(_, j)| *j)
                .collect();
            let misses: Vec<usize> = others
                .iter()
                .filter(|(_, j)| y[*j] != y[i])
                .take(config.n_neighbors)
                .map(|(_, j)| *j)
                .collect();

            let mut acc = Array1::zeros(x.ncols());
            if !hits.is_empty() {
                let scale = -1.0 / hits.len() as f64;
                for &j in &hits {
                    accumulate(&mut acc, &kinds, x, i, j, scale);
                }
            }
            if !misses.is_empty() {
                let scale = 1.0 / misses.len() as f64;
                for &j in &misses {
                    accumulate(&mut acc, &kinds, x, i, j, scale);
                }
            }
            acc
        })
        .collect();

    combine(contributions, x.ncols(), n)
}

/// MultiSURF weights with an adaptive neighbourhood per instance.
///
/// Neighbours of instance i are all instances closer than the mean distance
/// from i minus half its standard deviation.
pub fn multisurf(x: &Array2<f64>, y: &[u8], config: &ReliefConfig) -> Array1<f64> {
    let n = x.nrows();
    let kinds = FeatureKinds::from_data(x, config.discrete_threshold);

    let contributions: Vec<Array1<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut acc = Array1::zeros(x.ncols());
            if n < 2 {
                return acc;
            }
            let distances: Vec<(f64, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (kinds.distance(x, i, j), j))
                .collect();
            let m = distances.len() as f64;
            let mean = distances.iter().map(|(d, _)| d).sum::<f64>() / m;
            let variance = distances.iter().map(|(d, _)| (d - mean).powi(2)).sum::<f64>() / m;
            let threshold = mean - variance.sqrt() / 2.0;

            let (hits, misses): (Vec<usize>, Vec<usize>) = distances
                .iter()
                .filter(|(d, _)| *d < threshold)
                .map(|(_, j)| *j)
                .partition(|&j| y[j] == y[i]);

            if !hits.is_empty() {
                let scale = -1.0 / hits.len() as f64;
                for &j in &hits {
                    accumulate(&mut acc, &kinds, x, i, j, scale);
                }
            }
            if !misses.is_empty() {
                let scale = 1.0 / misses.len() as f64;
                for &j in &misses {
                    accumulate(&mut acc, &kinds, x, i, j, scale);
                }
            }
            acc
        })
        .collect();

    combine(contributions, x.ncols(), n)
}
