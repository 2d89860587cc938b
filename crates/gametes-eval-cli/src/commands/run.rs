use std::path::Path;

use anyhow::Result;

use gametes_eval::report::{write_html_report, write_summary_tsv};
use gametes_eval::{EvalConfig, RunSummary, Runner};

/// Run the benchmark and write the optional summary table and report.
pub fn run_benchmark(config: EvalConfig, summary_path: Option<&Path>, report_path: Option<&Path>) -> Result<RunSummary> {
    log::info!(
        "Evaluating {} heritability value(s) x {} dataset type(s) with {:?}",
        config.heritability_values.len(),
        config.dataset_types.len(),
        config.evaluators()
    );

    let runner = Runner::new(config)?;
    let summary = runner.run()?;

    if let Some(path) = summary_path {
        write_summary_tsv(&summary, path)?;
        log::info!("Summary written to {}", path.display());
    }
    if let Some(path) = report_path {
        write_html_report(&summary, path)?;
        log::info!("Report written to {}", path.display());
    }
    Ok(summary)
}
