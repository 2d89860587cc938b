//! Mutual information between each feature and the binary class, in nats.
use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use statrs::function::gamma::digamma;

use crate::config::MutualInfoConfig;

/// How the joint distribution of a feature and the class is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutualInfoEstimator {
    /// Plug-in estimate over the observed feature values.
    Discrete,
    /// Nearest-neighbour estimate for a continuous feature and discrete class.
    Knn,
}

/// Score every column of `x` against `y`. Negative estimates are clipped to 0.
///
/// The kNN estimator first adds seeded noise of relative size 1e-10 to every
/// column, so tied genotype codes still give each sample a non-zero radius.
pub fn mutual_information(
    x: &Array2<f64>,
    y: &[u8],
    config: &MutualInfoConfig,
    seed: u64,
) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    x.columns()
        .into_iter()
        .map(|col| {
            let mi = match config.estimator {
                MutualInfoEstimator::Discrete => discrete_mutual_info(col, y),
                MutualInfoEstimator::Knn => {
                    let noisy = jitter(col, &mut rng);
                    knn_mutual_info(noisy.view(), y, config.n_neighbors)
                }
            };
            mi.max(0.0)
        })
        .collect()
}

/// Add `1e-10 * max(1, mean |x|)` scaled standard normal noise to a column.
fn jitter(x: ArrayView1<f64>, rng: &mut StdRng) -> Array1<f64> {
    let Ok(normal) = Normal::new(0.0, 1.0) else {
        return x.to_owned();
    };
    let mean_abs = x.iter().map(|v| v.abs()).sum::<f64>() / x.len().max(1) as f64;
    let scale = 1e-10 * mean_abs.max(1.0);
    x.mapv(|v| v + scale * normal.sample(rng))
}

/// Plug-in mutual information treating every distinct value as its own symbol.
pub fn discrete_mutual_info(x: ArrayView1<f64>, y: &[u8]) -> f64 {
    let n = y.len();
    if n == 0 {
        return 0.0;
    }

    // Keyed on the bit pattern; -0.0 folded into 0.0.
    let mut joint: HashMap<(u64, u8), usize> = HashMap::new();
    let mut marginal_x: HashMap<u64, usize> = HashMap::new();
    let mut marginal_y = [0usize; 2];
    for (&value, &label) in x.iter().zip(y.iter()) {
        let key = if value == 0.0 { 0u64 } else { value.to_bits() };
        *joint.entry((key, label)).or_insert(0) += 1;
        *marginal_x.entry(key).or_insert(0) += 1;
        marginal_y[usize::from(label == 1)] += 1;
    }

    let n = n as f64;
    joint
        .iter()
        .map(|(&(key, label), &count)| {
            let pxy = count as f64 / n;
            let px = marginal_x[&key] as f64 / n;
            let py = marginal_y[usize::from(label == 1)] as f64 / n;
            pxy * (pxy / (px * py)).ln()
        })
        .sum()
}

/// Nearest-neighbour mutual information of a continuous `x` and discrete `y`.
///
/// For each sample the distance to its `k`-th neighbour within the same class
/// sets a radius, and the number of samples of any class strictly inside that
/// radius is compared against the class size. Samples alone in their class
/// are skipped. Heavily tied inputs collapse to a zero radius; callers jitter
/// them first.
pub fn knn_mutual_info(x: ArrayView1<f64>, y: &[u8], n_neighbors: usize) -> f64 {
    let n = y.len();
    let mut class_size = [0usize; 2];
    for &label in y {
        class_size[usize::from(label == 1)] += 1;
    }

    let values: Vec<f64> = x.to_vec();
    let mut sum_k = 0.0;
    let mut sum_label = 0.0;
    let mut sum_m = 0.0;
    let mut used = 0usize;

    for i in 0..n {
        let class = usize::from(y[i] == 1);
        if class_size[class] < 2 {
            continue;
        }
        let k = n_neighbors.min(class_size[class] - 1).max(1);

        let mut same: Vec<f64> = (0..n)
            .filter(|&j| j != i && usize::from(y[j] == 1) == class)
            .map(|j| (values[j] - values[i]).abs())
            .collect();
        same.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let radius = same[k - 1];

        // Counts the sample itself, as a radius query would.
        let m = values
            .iter()
            .filter(|&&v| {
                let d = (v - values[i]).abs();
                d < radius || (radius == 0.0 && d == 0.0)
            })
            .count();

        sum_k += digamma(k as f64);
        sum_label += digamma(class_size[class] as f64);
        sum_m += digamma(m as f64);
        used += 1;
    }

    if used == 0 {
        return 0.0;
    }
    let used_f = used as f64;
    digamma(used_f) + sum_k / used_f - sum_label / used_f - sum_m / used_f
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perfect_predictor_carries_class_entropy() {
        let x = Array1::from(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let y = [0u8, 0, 0, 1, 1, 1];
        assert_abs_diff_eq!(discrete_mutual_info(x.view(), &y), 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn independent_feature_carries_nothing() {
        let x = Array1::from(vec![0.0, 1.0, 0.0, 1.0]);
        let y = [0u8, 0, 1, 1];
        assert_abs_diff_eq!(discrete_mutual_info(x.view(), &y), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn knn_ranks_informative_feature_higher() {
        let informative = Array1::from(vec![0.1, 0.2, 0.3, 0.4, 0.5, 2.1, 2.2, 2.3, 2.4, 2.5]);
        let noise = Array1::from(vec![0.1, 2.2, 0.3, 2.4, 0.5, 2.1, 0.2, 2.3, 0.4, 2.5]);
        let y = [0u8, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let good = knn_mutual_info(informative.view(), &y, 3);
        let bad = knn_mutual_info(noise.view(), &y, 3);
        assert!(good > bad, "{} <= {}", good, bad);
    }

    #[test]
    fn scores_are_never_negative() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let config = MutualInfoConfig {
            estimator: MutualInfoEstimator::Knn,
            n_neighbors: 3,
        };
        let scores = mutual_information(&x, &[0, 0, 1, 1], &config, 42);
        assert!(scores[0] >= 0.0);
    }

    #[test]
    fn knn_handles_genotype_codes() {
        // 200 rows of 0/1/2 codes. Column 0 is independent of the class;
        // column 1 is 2 * class except on every fifth row, where it is 1.
        let n = 200;
        let mut x = Array2::<f64>::zeros((n, 2));
        let mut y = Vec::with_capacity(n);
        for row in 0..n {
            let class = (row % 2) as u8;
            y.push(class);
            x[[row, 0]] = ((row / 2) % 3) as f64;
            x[[row, 1]] = if row % 5 == 0 { 1.0 } else { 2.0 * f64::from(class) };
        }
        let config = MutualInfoConfig {
            estimator: MutualInfoEstimator::Knn,
            n_neighbors: 3,
        };

        let scores = mutual_information(&x, &y, &config, 42);
        assert!(scores[1] > 0.2, "associated column scored {}", scores[1]);
        assert!(scores[1] > scores[0], "{} <= {}", scores[1], scores[0]);
        assert!(scores[0] < 0.1, "independent column scored {}", scores[0]);

        let again = mutual_information(&x, &y, &config, 42);
        assert_eq!(scores, again);
    }
}
