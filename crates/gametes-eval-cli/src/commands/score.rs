use std::path::Path;

use anyhow::Result;

use gametes_eval::{DatasetType, EvalConfig, Evaluation, EvaluatorKind, Runner};

/// Evaluate a single file with the configured evaluators.
pub fn score_file(path: &Path, dataset_type: DatasetType, config: EvalConfig) -> Result<Vec<(EvaluatorKind, Evaluation)>> {
    let runner = Runner::new(config)?;
    runner.evaluate_file(path, dataset_type)
}

/// `kind  recovered  accuracy  top features`, one line per evaluator.
pub fn format_scores(results: &[(EvaluatorKind, Evaluation)]) -> String {
    let mut out = String::from("evaluator\trecovered\taccuracy\ttop_features\n");
    for (kind, evaluation) in results {
        let accuracy = evaluation
            .accuracy
            .map_or_else(|| "-".to_string(), |a| format!("{:.4}", a));
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            kind,
            evaluation.recovered,
            accuracy,
            evaluation.top_features.join(",")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_row_per_evaluator() {
        let results = vec![
            (
                EvaluatorKind::Pearson,
                Evaluation {
                    recovered: 1,
                    accuracy: None,
                    top_features: vec!["M0P0".to_string()],
                },
            ),
            (
                EvaluatorKind::RandomForest,
                Evaluation {
                    recovered: 0,
                    accuracy: Some(0.8125),
                    top_features: vec!["N3".to_string(), "M0P0".to_string()],
                },
            ),
        ];
        let text = format_scores(&results);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "pearson\t1\t-\tM0P0");
        assert_eq!(lines[2], "random_forest\t0\t0.8125\tN3,M0P0");
    }
}
