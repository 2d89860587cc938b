use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Assign average ranks (1-based) to `values`, ties sharing the mean rank.
pub fn rankdata(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share ranks start+1..=end.
        let average = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        start = end;
    }
    ranks
}

/// Sizes of the groups of tied values.
fn tie_groups(values: &[f64]) -> Vec<usize> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut groups = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        groups.push(end - start);
        start = end;
    }
    groups
}

/// Mann-Whitney U test of `x` against `y`.
///
/// Returns the U statistic of `x` and the two-sided p-value from the normal
/// approximation with tie and continuity corrections. When every value is
/// tied the statistic carries no information and the p-value is 1.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    if x.is_empty() || y.is_empty() {
        return (f64::NAN, 1.0);
    }

    let pooled: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let ranks = rankdata(&pooled);
    let rank_sum_x: f64 = ranks[..x.len()].iter().sum();
    let u1 = rank_sum_x - n1 * (n1 + 1.0) / 2.0;

    let n = n1 + n2;
    let tie_term: f64 = tie_groups(&pooled)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if !(variance > 0.0) {
        return (u1, 1.0);
    }

    let mean = n1 * n2 / 2.0;
    let z = ((u1 - mean).abs() - 0.5).max(0.0) / variance.sqrt();
    let p = match Normal::new(0.0, 1.0) {
        Ok(normal) => (2.0 * normal.sf(z)).min(1.0),
        Err(_) => 1.0,
    };
    (u1, p)
}

/// Two-sided p-value of a correlation coefficient `r` over `n` samples.
///
/// Uses t = r * sqrt((n - 2) / (1 - r^2)) against Student's t with n - 2
/// degrees of freedom. A perfect correlation gives 0; an undefined one gives 1.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if !r.is_finite() || n < 3 {
        return 1.0;
    }
    let r = r.clamp(-1.0, 1.0);
    if (1.0 - r.abs()) <= f64::EPSILON {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => 1.0,
    }
}

/// Pearson correlation coefficient, NaN when either side is constant.
pub fn pearson_r(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}

/// Pearson correlation and its two-sided p-value.
pub fn pearson(x: &[f64], y: &[f64]) -> (f64, f64) {
    let r = pearson_r(x, y);
    (r, correlation_p_value(r, x.len()))
}

/// Spearman rank correlation and its two-sided p-value.
pub fn spearman(x: &[f64], y: &[f64]) -> (f64, f64) {
    let rx = rankdata(x);
    let ry = rankdata(y);
    pearson(&rx, &ry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ranks_average_ties() {
        let ranks = rankdata(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn mann_whitney_matches_reference() {
        // Reference: two-sided, continuity corrected normal approximation.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [6.0, 7.0, 8.0, 9.0, 10.0];
        let (u, p) = mann_whitney_u(&x, &y);
        assert_abs_diff_eq!(u, 0.0);
        assert_abs_diff_eq!(p, 0.012186, epsilon = 1e-5);
    }

    #[test]
    fn mann_whitney_constant_is_uninformative() {
        let (_, p) = mann_whitney_u(&[1.0, 1.0], &[1.0, 1.0, 1.0]);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn correlation_p_values() {
        assert_eq!(correlation_p_value(1.0, 10), 0.0);
        assert_eq!(correlation_p_value(f64::NAN, 10), 1.0);
        // r = 0.5 over 20 samples: t = 2.449, df = 18
        assert_abs_diff_eq!(correlation_p_value(0.5, 20), 0.02474, epsilon = 1e-4);
    }

    #[test]
    fn spearman_is_rank_based() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 4.0, 9.0, 16.0, 100.0];
        let (rho, p) = spearman(&x, &y);
        assert_abs_diff_eq!(rho, 1.0, epsilon = 1e-12);
        assert_eq!(p, 0.0);
        let (r, _) = pearson(&x, &y);
        assert!(r < 1.0);
    }
}
