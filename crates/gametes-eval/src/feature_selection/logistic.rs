//! Univariate logistic regression with a Wald test on the slope.
//!
//! Every feature gets its own model `logit P(y = 1) = b0 + b1 * x`, fitted by
//! Newton-Raphson with an L2 penalty of `1 / c` on the slope only. The slope's
//! standard error comes from the inverse of the unpenalised Fisher information
//! at the fitted coefficients and is turned into a two-sided normal p-value.
use ndarray::{Array1, Array2, ArrayView1};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::config::LogisticConfig;

// Below this determinant the information matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Outcome of a single-feature logistic fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticFit {
    pub intercept: f64,
    pub coefficient: f64,
    /// Standard error of `coefficient`, NaN when undefined.
    pub std_error: f64,
    /// Wald z statistic of `coefficient`.
    pub statistic: f64,
    /// Two-sided p-value of `coefficient`.
    pub p_value: f64,
    pub iterations: usize,
    pub converged: bool,
    /// The classes are split by a threshold on the feature.
    pub separated: bool,
}

impl LogisticFit {
    fn uninformative(intercept: f64) -> Self {
        LogisticFit {
            intercept,
            coefficient: 0.0,
            std_error: f64::NAN,
            statistic: f64::NAN,
            p_value: 1.0,
            iterations: 0,
            converged: true,
            separated: false,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn log_likelihood(x: &ArrayView1<f64>, y: &[u8], b0: f64, b1: f64, penalty: f64) -> f64 {
    let mut ll = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let eta = b0 + b1 * xi;
        // log(1 + e^eta) without overflow
        let softplus = if eta > 0.0 {
            eta + (-eta).exp().ln_1p()
        } else {
            eta.exp().ln_1p()
        };
        ll += f64::from(yi) * eta - softplus;
    }
    ll - 0.5 * penalty * b1 * b1
}

/// Whether the two classes occupy disjoint ranges of `x`.
///
/// Shared boundary values (quasi-complete separation) do not count; those
/// columns are fitted and get a huge standard error instead.
fn is_separated(x: &ArrayView1<f64>, y: &[u8]) -> bool {
    let mut bounds = [(f64::INFINITY, f64::NEG_INFINITY); 2];
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let b = &mut bounds[usize::from(yi == 1)];
        b.0 = b.0.min(xi);
        b.1 = b.1.max(xi);
    }
    let [(min0, max0), (min1, max1)] = bounds;
    max0 < min1 || max1 < min0
}

/// Fit `y ~ b0 + b1 * x` and test `b1 = 0`.
pub fn fit_univariate_logistic(x: ArrayView1<f64>, y: &[u8], config: &LogisticConfig) -> LogisticFit {
    let n = y.len() as f64;
    let positives = y.iter().filter(|&&v| v == 1).count() as f64;
    let base_rate = (positives / n).clamp(1e-12, 1.0 - 1e-12);
    let null_intercept = (base_rate / (1.0 - base_rate)).ln();

    let constant = x.get(0).map_or(true, |&first| x.iter().all(|&v| v == first));
    if constant || positives == 0.0 || positives == n {
        return LogisticFit::uninformative(null_intercept);
    }

    if is_separated(&x, y) {
        // The slope diverges, so the evidence is as strong as it gets.
        return LogisticFit {
            intercept: null_intercept,
            coefficient: f64::INFINITY,
            std_error: f64::NAN,
            statistic: f64::INFINITY,
            p_value: 0.0,
            iterations: 0,
            converged: false,
            separated: true,
        };
    }

    let penalty = if config.c > 0.0 { 1.0 / config.c } else { 0.0 };
    let mut b0 = null_intercept;
    let mut b1 = 0.0;
    let mut current = log_likelihood(&x, y, b0, b1, penalty);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iter {
        iterations += 1;
        let (mut g0, mut g1) = (0.0, -penalty * b1);
        let (mut h00, mut h01, mut h11) = (0.0, 0.0, penalty);
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let p = sigmoid(b0 + b1 * xi);
            let r = f64::from(yi) - p;
            let w = p * (1.0 - p);
            g0 += r;
            g1 += r * xi;
            h00 += w;
            h01 += w * xi;
            h11 += w * xi * xi;
        }
        let det = h00 * h11 - h01 * h01;
        if det.abs() < SINGULAR_TOLERANCE {
            break;
        }
        let step0 = (h11 * g0 - h01 * g1) / det;
        let step1 = (h00 * g1 - h01 * g0) / det;

        // Halve the step until the penalised likelihood stops falling.
        let mut scale = 1.0;
        let mut accepted = false;
        for _ in 0..30 {
            let (c0, c1) = (b0 + scale * step0, b1 + scale * step1);
            let candidate = log_likelihood(&x, y, c0, c1, penalty);
            if candidate.is_finite() && candidate >= current - 1e-12 {
                b0 = c0;
                b1 = c1;
                current = candidate;
                accepted = true;
                break;
            }
            scale *= 0.5;
        }
        if !accepted {
            break;
        }
        if (scale * step0).abs().max((scale * step1).abs()) < config.tol {
            converged = true;
            break;
        }
    }
    if !converged {
        log::debug!(
            "Logistic fit stopped after {} iterations without converging (b1 = {})",
            iterations,
            b1
        );
    }

    // Unpenalised Fisher information at the estimate.
    let (mut i00, mut i01, mut i11) = (0.0, 0.0, 0.0);
    for &xi in x.iter() {
        let p = sigmoid(b0 + b1 * xi);
        let w = p * (1.0 - p);
        i00 += w;
        i01 += w * xi;
        i11 += w * xi * xi;
    }
    let det = i00 * i11 - i01 * i01;
    if !(det.abs() >= SINGULAR_TOLERANCE) {
        return LogisticFit {
            intercept: b0,
            coefficient: b1,
            iterations,
            converged,
            ..LogisticFit::uninformative(b0)
        };
    }

    let variance = i00 / det;
    let std_error = variance.max(0.0).sqrt();
    let statistic = b1 / std_error;
    let p_value = match Normal::new(0.0, 1.0) {
        Ok(normal) if statistic.is_finite() => (2.0 * normal.sf(statistic.abs())).min(1.0),
        _ => 1.0,
    };

    LogisticFit {
        intercept: b0,
        coefficient: b1,
        std_error,
        statistic,
        p_value,
        iterations,
        converged,
        separated: false,
    }
}

/// Slope p-value of a univariate logistic model for every column.
pub fn logistic_pvalues(x: &Array2<f64>, y: &[u8], config: &LogisticConfig) -> Array1<f64> {
    x.columns()
        .into_iter()
        .map(|col| fit_univariate_logistic(col, y, config).p_value)
        .collect()
}
