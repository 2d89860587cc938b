//! Univariate association tests of each feature against the class label.
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

use crate::stats::{correlation_p_value, mann_whitney_u, spearman};

/// Compute row-wise (squared) Euclidean norms of a 2D array.
///
/// Applied to a transposed matrix this yields per-column norms.
pub fn row_norms<S>(x: &ArrayBase<S, Ix2>, squared: bool) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let mut norms = Array1::zeros(x.nrows());
    for (i, row) in x.axis_iter(Axis(0)).enumerate() {
        let sum_of_squares: f64 = row.iter().map(|&val| val * val).sum();
        norms[i] = if squared {
            sum_of_squares
        } else {
            sum_of_squares.sqrt()
        };
    }
    norms
}

/// Pearson's r between every column of `x` and `y`.
///
/// Columns with zero variance (and a constant `y`) give NaN, which callers map
/// to an uninformative p-value.
pub fn r_regression(x: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
    let n_samples = x.nrows() as f64;
    if x.nrows() == 0 {
        return Array1::from_elem(x.ncols(), f64::NAN);
    }

    let y_mean = y.sum() / n_samples;
    let y_centered = y.mapv(|v| v - y_mean);
    let x_means = x.sum_axis(Axis(0)) / n_samples;
    let x_centered = x - &x_means.view().insert_axis(Axis(0));

    let x_norms = row_norms(&x_centered.t(), false);
    let y_norm = y_centered.dot(&y_centered).sqrt();
    let y_constant = is_constant(y.iter());

    let mut correlation = Array1::zeros(x.ncols());
    for (i, col) in x_centered.columns().into_iter().enumerate() {
        // Constant columns have no defined correlation.
        if y_constant || is_constant(x.column(i).iter()) {
            correlation[i] = f64::NAN;
            continue;
        }
        let r = col.dot(&y_centered) / (x_norms[i] * y_norm);
        // Float noise can push a perfect correlation just past one.
        correlation[i] = if r.is_finite() { r.clamp(-1.0, 1.0) } else { f64::NAN };
    }
    correlation
}

fn is_constant<'a, I: Iterator<Item = &'a f64>>(mut values: I) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

fn labels_as_f64(y: &[u8]) -> Array1<f64> {
    y.iter().map(|&v| f64::from(v)).collect()
}

/// Two-sided Pearson correlation p-value of every column against the class.
pub fn pearson_pvalues(x: &Array2<f64>, y: &[u8]) -> Array1<f64> {
    let r = r_regression(x, &labels_as_f64(y));
    r.mapv(|r| correlation_p_value(r, x.nrows()))
}

/// Two-sided Spearman rank-correlation p-value of every column against the class.
pub fn spearman_pvalues(x: &Array2<f64>, y: &[u8]) -> Array1<f64> {
    let labels = labels_as_f64(y).to_vec();
    x.columns()
        .into_iter()
        .map(|col| spearman(&col.to_vec(), &labels).1)
        .collect()
}

/// Mann-Whitney U p-value of every column, comparing class 0 to class 1.
pub fn mann_whitney_pvalues(x: &Array2<f64>, y: &[u8]) -> Array1<f64> {
    x.columns()
        .into_iter()
        .map(|col| {
            let mut controls = Vec::new();
            let mut cases = Vec::new();
            for (&value, &label) in col.iter().zip(y.iter()) {
                if label == 1 {
                    cases.push(value);
                } else {
                    controls.push(value);
                }
            }
            mann_whitney_u(&controls, &cases).1
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Columns: [noise, perfectly separating, constant, weakly related]
    fn fixture() -> (Array2<f64>, Vec<u8>) {
        let x = Array2::from_shape_vec(
            (10, 4),
            vec![
                0.1, 0.0, 5.0, 0.0, //
                0.4, 0.0, 5.0, 1.0, //
                0.6, 0.0, 5.0, 0.0, //
                0.9, 0.0, 5.0, 0.0, //
                1.2, 0.0, 5.0, 1.0, //
                0.3, 2.0, 5.0, 1.0, //
                0.7, 2.0, 5.0, 2.0, //
                0.2, 2.0, 5.0, 1.0, //
                1.1, 2.0, 5.0, 2.0, //
                0.5, 2.0, 5.0, 0.0, //
            ],
        )
        .unwrap();
        let y = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn row_norms_of_transpose_are_column_norms() {
        let x = Array2::from_shape_vec((2, 2), vec![3.0, 0.0, 4.0, 1.0]).unwrap();
        let norms = row_norms(&x.t(), false);
        assert_abs_diff_eq!(norms[0], 5.0);
        assert_abs_diff_eq!(norms[1], 1.0);
    }

    #[test]
    fn r_regression_flags_constant_columns() {
        let (x, y) = fixture();
        let r = r_regression(&x, &labels_as_f64(&y));
        assert_abs_diff_eq!(r[1], 1.0, epsilon = 1e-12);
        assert!(r[2].is_nan());
    }

    #[test]
    fn spearman_agrees_with_pearson_on_ranks() {
        let (x, y) = fixture();
        let p = spearman_pvalues(&x, &y);

        let mut ranked = Array2::zeros(x.raw_dim());
        for (mut dst, src) in ranked.columns_mut().into_iter().zip(x.columns()) {
            dst.assign(&Array1::from(crate::stats::rankdata(&src.to_vec())));
        }
        let y_ranks = Array1::from(crate::stats::rankdata(&labels_as_f64(&y).to_vec()));
        let r = r_regression(&ranked, &y_ranks);

        for col in [0, 3] {
            let expected = correlation_p_value(r[col], x.nrows());
            assert_abs_diff_eq!(p[col], expected, epsilon = 1e-10);
        }
        assert!(p[3] < p[0]);
    }

    #[test]
    fn separating_column_wins_every_univariate_test() {
        let (x, y) = fixture();
        for p in [
            pearson_pvalues(&x, &y),
            spearman_pvalues(&x, &y),
            mann_whitney_pvalues(&x, &y),
        ] {
            let best = p
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |acc, (i, &v)| if v < acc.1 { (i, v) } else { acc })
                .0;
            assert_eq!(best, 1, "p-values: {:?}", p);
            assert_eq!(p[2], 1.0);
        }
    }
}
