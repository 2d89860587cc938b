/// Fraction of predictions equal to the truth.
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Mean per-class recall over the classes present in `y_true`.
pub fn balanced_accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let mut support = [0usize; 2];
    let mut hits = [0usize; 2];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        let class = usize::from(t == 1);
        support[class] += 1;
        if t == p {
            hits[class] += 1;
        }
    }

    let recalls: Vec<f64> = (0..2)
        .filter(|&c| support[c] > 0)
        .map(|c| hits[c] as f64 / support[c] as f64)
        .collect();
    if recalls.is_empty() {
        0.0
    } else {
        recalls.iter().sum::<f64>() / recalls.len() as f64
    }
}
