//! Persist accumulators as list-literal text files.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::accumulator::{Accumulator, GroupResults, ListValue};
use crate::config::EvalConfig;
use crate::io::layout::output_path;
use crate::oracle::DatasetType;

/// Overwrite `path` with the printed form of `values`, creating parent
/// directories as needed.
pub fn write_accumulator<T: ListValue, P: AsRef<Path>>(path: P, values: &Accumulator<T>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, values.to_string())
        .with_context(|| format!("Failed to write results: {}", path.display()))?;
    Ok(())
}

/// Write every accumulator of one group; returns the paths written.
pub fn persist_group(
    config: &EvalConfig,
    heritability: &str,
    dataset_type: DatasetType,
    results: &GroupResults,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for evaluator in &results.evaluators {
        let path = output_path(config, heritability, dataset_type, evaluator.kind.recovery_output());
        write_accumulator(&path, &evaluator.recovery)?;
        written.push(path);

        if let (Some(metric), Some(accuracy)) = (evaluator.kind.accuracy_output(), &evaluator.accuracy) {
            let path = output_path(config, heritability, dataset_type, metric);
            write_accumulator(&path, accuracy)?;
            written.push(path);
        }
    }
    for path in &written {
        log::debug!("Wrote {}", path.display());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::{Evaluation, EvaluatorKind};

    #[test]
    fn round_trips_printed_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/mwOutput.txt");
        let acc = Accumulator::from(vec![1u8, 0, 1, 1, 0]);
        write_accumulator(&path, &acc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 0, 1, 1, 0]");

        // Overwrites rather than appends.
        write_accumulator(&path, &Accumulator::from(vec![0u8])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[0]");
    }

    #[test]
    fn classifier_groups_write_both_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let config = EvalConfig {
            base_directory: dir.path().to_path_buf(),
            ..EvalConfig::default()
        };
        let mut results = GroupResults::new(&[EvaluatorKind::DecisionTree, EvaluatorKind::Pearson]);
        for r in results.evaluators.iter_mut() {
            r.record(&Evaluation {
                recovered: 1,
                accuracy: Some(0.5),
                top_features: Vec::new(),
            });
        }
        let written = persist_group(&config, "80", DatasetType::M1, &results).unwrap();
        assert_eq!(written.len(), 3);

        let out = dir.path().join("heritability_80/m1_EDM-1/output");
        assert_eq!(fs::read_to_string(out.join("dtPositiveOutput.txt")).unwrap(), "[1]");
        assert_eq!(fs::read_to_string(out.join("dtAccuracyOutput.txt")).unwrap(), "[0.5]");
        assert_eq!(fs::read_to_string(out.join("pcOutput.txt")).unwrap(), "[1]");
    }
}
