//! Run summaries as TSV tables and HTML reports.
use std::path::Path;

use anyhow::{Context, Result};

use crate::driver::RunSummary;

pub mod html;
pub mod plots;

pub use html::{build_report, write_html_report, Report, ReportSection};

/// One row per group and evaluator; missing rates are left empty.
pub fn write_summary_tsv<P: AsRef<Path>>(summary: &RunSummary, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Failed to create summary: {}", path.display()))?;
    for group in &summary.groups {
        writer
            .serialize(group)
            .with_context(|| format!("Failed to write summary row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush summary: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::GroupSummary;
    use crate::evaluators::EvaluatorKind;
    use crate::oracle::DatasetType;

    fn summary() -> RunSummary {
        RunSummary {
            groups: vec![
                GroupSummary {
                    heritability: "70".to_string(),
                    dataset_type: DatasetType::M1,
                    evaluator: EvaluatorKind::Pearson,
                    files: 3,
                    recovery_rate: Some(2.0 / 3.0),
                    mean_accuracy: None,
                },
                GroupSummary {
                    heritability: "80".to_string(),
                    dataset_type: DatasetType::M1,
                    evaluator: EvaluatorKind::DecisionTree,
                    files: 2,
                    recovery_rate: Some(1.0),
                    mean_accuracy: Some(0.75),
                },
            ],
        }
    }

    #[test]
    fn summary_tsv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.tsv");
        write_summary_tsv(&summary(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "heritability\tdataset_type\tevaluator\tfiles\trecovery_rate\tmean_accuracy"
        );
        assert!(lines[1].starts_with("70\tm1\tpearson\t3\t"));
        assert!(lines[1].ends_with('\t'));
        assert_eq!(lines[2], "80\tm1\tdecision_tree\t2\t1.0\t0.75");
    }

    #[test]
    fn html_report_contains_table_and_plots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_html_report(&summary(), &path).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("decision_tree"));
        assert!(html.contains("Recovery rate (m1)"));
    }
}
