//! Sequential benchmark driver.
//!
//! For every heritability value and dataset type the runner discovers the
//! group's files, evaluates each file with every active evaluator in turn,
//! and writes the group's accumulators once its file loop is complete. The
//! first error aborts the run, so a failed group leaves no output behind.
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::accumulator::GroupResults;
use crate::config::EvalConfig;
use crate::evaluators::{build_evaluator, Evaluation, Evaluator, EvaluatorKind};
use crate::io::layout::{data_dir, discover_files};
use crate::io::output::persist_group;
use crate::io::tsv::{read_dataset, TsvReaderConfig};
use crate::oracle::DatasetType;

/// Aggregate of one evaluator over one (heritability, dataset type) group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub heritability: String,
    pub dataset_type: DatasetType,
    pub evaluator: EvaluatorKind,
    pub files: usize,
    pub recovery_rate: Option<f64>,
    pub mean_accuracy: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub groups: Vec<GroupSummary>,
}

impl RunSummary {
    pub fn for_evaluator(&self, kind: EvaluatorKind) -> impl Iterator<Item = &GroupSummary> {
        self.groups.iter().filter(move |g| g.evaluator == kind)
    }
}

pub struct Runner {
    config: EvalConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
    reader: TsvReaderConfig,
}

impl Runner {
    /// Validate `config` and build the active evaluators once.
    pub fn new(config: EvalConfig) -> crate::error::Result<Self> {
        config.validate()?;
        let evaluators = config
            .evaluators()
            .into_iter()
            .map(|kind| build_evaluator(kind, &config))
            .collect();
        let reader = TsvReaderConfig::with_label_column(&config.layout.label_column);
        Ok(Runner {
            config,
            evaluators,
            reader,
        })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn evaluator_kinds(&self) -> Vec<EvaluatorKind> {
        self.evaluators.iter().map(|e| e.kind()).collect()
    }

    /// Run every evaluator on a single dataset file.
    pub fn evaluate_file(&self, path: &Path, dataset_type: DatasetType) -> Result<Vec<(EvaluatorKind, Evaluation)>> {
        let dataset = read_dataset(path, &self.reader)?;
        dataset.log_summary();

        let mut evaluations = Vec::with_capacity(self.evaluators.len());
        for evaluator in &self.evaluators {
            let evaluation = evaluator
                .evaluate(&dataset, dataset_type)
                .with_context(|| format!("{} failed on {}", evaluator.kind(), path.display()))?;
            evaluations.push((evaluator.kind(), evaluation));
        }
        Ok(evaluations)
    }

    /// Evaluate one group's files and persist its accumulators.
    pub fn run_group(&self, heritability: &str, dataset_type: DatasetType) -> Result<GroupResults> {
        let kinds = self.evaluator_kinds();
        let mut results = GroupResults::new(&kinds);

        let dir = data_dir(&self.config, heritability, dataset_type);
        let files = discover_files(&dir, &self.config.layout.file_extension, self.config.max_files_per_group)?;

        for (idx, path) in files.iter().enumerate() {
            log::info!("On dataset {} of {}: {}", idx + 1, files.len(), path.display());
            for (kind, evaluation) in self.evaluate_file(path, dataset_type)? {
                if let Some(slot) = results.get_mut(kind) {
                    slot.record(&evaluation);
                }
            }
        }

        persist_group(&self.config, heritability, dataset_type, &results)?;
        Ok(results)
    }

    /// Walk every heritability × dataset type group in configuration order.
    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for heritability in &self.config.heritability_values {
            for &dataset_type in &self.config.dataset_types {
                log::info!(
                    "Working on heritability {} and dataset {}",
                    heritability,
                    dataset_type
                );
                let results = self.run_group(heritability, dataset_type)?;

                for evaluator in &results.evaluators {
                    let group = GroupSummary {
                        heritability: heritability.clone(),
                        dataset_type,
                        evaluator: evaluator.kind,
                        files: evaluator.recovery.len(),
                        recovery_rate: evaluator.recovery.rate(),
                        mean_accuracy: evaluator.accuracy.as_ref().and_then(|a| a.mean()),
                    };
                    log::info!(
                        "{} on heritability {} / {}: recovered {} of {} datasets",
                        group.evaluator,
                        heritability,
                        dataset_type,
                        evaluator.recovery.values().iter().filter(|&&v| v == 1).count(),
                        group.files
                    );
                    summary.groups.push(group);
                }
            }
        }
        Ok(summary)
    }
}
