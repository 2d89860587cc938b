//! In-memory case/control table and the partitions used for model selection.
//!
//! `Dataset` keeps the feature matrix, the binary class vector and the column
//! names side by side. Splitting helpers return row indices or new datasets
//! so the same table can be re-partitioned without copying the source file.
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{EvalError, Result};

/// Train/test row indices of one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix, shape (n_samples, n_features)
    pub x: Array2<f64>,
    /// Class labels, 0 or 1
    pub y: Array1<u8>,
    /// Feature names in column order
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<u8>, feature_names: Vec<String>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(EvalError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if x.ncols() != feature_names.len() {
            return Err(EvalError::DimensionMismatch {
                expected: x.ncols(),
                actual: feature_names.len(),
            });
        }
        if feature_names.is_empty() {
            return Err(EvalError::NoFeatures);
        }
        if let Some(pos) = y.iter().position(|&label| label > 1) {
            return Err(EvalError::NonBinaryLabel {
                value: y[pos].to_string(),
                row: pos + 1,
            });
        }
        Ok(Dataset {
            x,
            y,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn column(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.x.column(idx)
    }

    pub fn column_by_name(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.x.column(idx))
    }

    pub fn labels(&self) -> Vec<u8> {
        self.y.to_vec()
    }

    /// Number of samples in class 0 and class 1.
    pub fn class_counts(&self) -> [usize; 2] {
        let ones = self.y.iter().filter(|&&v| v == 1).count();
        [self.y.len() - ones, ones]
    }

    pub fn log_summary(&self) {
        let [controls, cases] = self.class_counts();
        log::debug!(
            "Dataset with {} samples ({} controls, {} cases) and {} features",
            self.n_samples(),
            controls,
            cases,
            self.n_features()
        );
    }

    /// Rows at `indices`, in that order (repeats allowed).
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Shuffled, non-stratified hold-out split.
    ///
    /// The test set holds `ceil(test_fraction * n)` rows and the remaining rows
    /// train; both keep the shuffled order.
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> Partition {
        let n_samples = self.n_samples();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((n_samples as f64) * test_fraction).ceil() as usize;
        let n_test = n_test.min(n_samples.saturating_sub(1));
        let test = indices[..n_test].to_vec();
        let train = indices[n_test..].to_vec();
        Partition { train, test }
    }

    /// Shuffled K-fold: every row lands in exactly one test fold.
    ///
    /// The first `n % k` folds hold one extra row.
    pub fn k_fold(&self, k: usize, seed: u64) -> Vec<Partition> {
        let n_samples = self.n_samples();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let k = k.max(1).min(n_samples.max(1));
        let base = n_samples / k;
        let extra = n_samples % k;

        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for fold in 0..k {
            let size = base + usize::from(fold < extra);
            let test: Vec<usize> = indices[start..start + size].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            folds.push(Partition { train, test });
            start += size;
        }
        folds
    }
}

/// Unshuffled stratified K-fold over `labels`.
///
/// Within each class, rows are taken in their original order and dealt into
/// contiguous chunks whose sizes differ by at most one, so every fold sees
/// close to the overall class balance.
pub fn stratified_k_fold(labels: &[u8], k: usize) -> Vec<Partition> {
    let k = k.max(1);
    let mut fold_of = vec![0usize; labels.len()];

    for class in [0u8, 1u8] {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| if l == class { Some(i) } else { None })
            .collect();
        let base = members.len() / k;
        let extra = members.len() % k;
        let mut start = 0;
        for fold in 0..k {
            let size = base + usize::from(fold < extra);
            for &row in &members[start..start + size] {
                fold_of[row] = fold;
            }
            start += size;
        }
    }

    (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&row| fold_of[row] == fold);
            Partition { train, test }
        })
        .collect()
}
