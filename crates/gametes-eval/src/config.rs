use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::evaluators::EvaluatorKind;
use crate::feature_selection::mutual_info::MutualInfoEstimator;
use crate::models::tree::{MaxFeatures, SplitCriterion};
use crate::oracle::DatasetType;

/// Central configuration for a benchmark run.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct EvalConfig {
    /// Root holding the `heritability_<h>` directories.
    pub base_directory: PathBuf,
    /// Heritability tokens as they appear in directory names, e.g. "70".
    pub heritability_values: Vec<String>,
    pub dataset_types: Vec<DatasetType>,
    pub active_evaluators: Vec<EvaluatorKind>,
    pub max_files_per_group: usize,
    pub seed: u64,
    pub layout: LayoutConfig,
    pub split: SplitConfig,
    pub models: ModelsConfig,
    pub relief: ReliefConfig,
    pub mutual_information: MutualInfoConfig,
    pub logistic: LogisticConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("varyingHeritability"),
            heritability_values: vec!["70".to_string(), "80".to_string(), "90".to_string()],
            dataset_types: DatasetType::ALL.to_vec(),
            active_evaluators: vec![EvaluatorKind::GradientBoosting],
            max_files_per_group: 30,
            seed: 42,
            layout: LayoutConfig::default(),
            split: SplitConfig::default(),
            models: ModelsConfig::default(),
            relief: ReliefConfig::default(),
            mutual_information: MutualInfoConfig::default(),
            logistic: LogisticConfig::default(),
        }
    }
}

impl EvalConfig {
    /// Active evaluators with duplicates removed, first occurrence kept.
    pub fn evaluators(&self) -> Vec<EvaluatorKind> {
        let mut kinds = Vec::with_capacity(self.active_evaluators.len());
        for kind in &self.active_evaluators {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    pub fn validate(&self) -> Result<()> {
        if self.heritability_values.is_empty() {
            return Err(EvalError::InvalidConfig(
                "heritability_values must not be empty".to_string(),
            ));
        }
        if self.dataset_types.is_empty() {
            return Err(EvalError::InvalidConfig(
                "dataset_types must not be empty".to_string(),
            ));
        }
        if self.active_evaluators.is_empty() {
            return Err(EvalError::InvalidConfig(
                "at least one evaluator must be active".to_string(),
            ));
        }
        if self.max_files_per_group == 0 {
            return Err(EvalError::InvalidConfig(
                "max_files_per_group must be positive".to_string(),
            ));
        }
        if !(self.split.test_fraction > 0.0 && self.split.test_fraction < 1.0) {
            return Err(EvalError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.split.test_fraction
            )));
        }
        if self.split.cv_folds < 2 {
            return Err(EvalError::InvalidConfig(format!(
                "cv_folds must be at least 2, got {}",
                self.split.cv_folds
            )));
        }
        if self.models.decision_tree_repeats == 0 {
            return Err(EvalError::InvalidConfig(
                "decision_tree_repeats must be positive".to_string(),
            ));
        }
        if self.relief.n_neighbors == 0 || self.mutual_information.n_neighbors == 0 {
            return Err(EvalError::InvalidConfig(
                "neighbour counts must be positive".to_string(),
            ));
        }
        self.models.decision_tree.check("decision_tree")?;
        self.models.random_forest.check()?;
        self.models.gradient_boosting.check()?;
        Ok(())
    }
}

/// Directory naming of the GAMETES output tree.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct LayoutConfig {
    /// Appended to the dataset-type tag, e.g. `m1_EDM-1`.
    pub dataset_suffix: String,
    pub data_dir: String,
    pub output_dir: String,
    pub file_extension: String,
    pub label_column: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dataset_suffix: "_EDM-1".to_string(),
            data_dir: "data".to_string(),
            output_dir: "output".to_string(),
            file_extension: "txt".to_string(),
            label_column: "Class".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    /// Internal folds of the hyper-parameter search.
    pub cv_folds: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            cv_folds: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ModelsConfig {
    pub decision_tree: TreeGrid,
    /// Distinct K-fold partitions the decision tree is averaged over.
    pub decision_tree_repeats: usize,
    pub random_forest: ForestGrid,
    pub gradient_boosting: BoostGrid,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            decision_tree: TreeGrid::default(),
            decision_tree_repeats: 5,
            random_forest: ForestGrid::default(),
            gradient_boosting: BoostGrid::default(),
        }
    }
}

/// Search space of a single CART tree. `None` depth means unlimited.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct TreeGrid {
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
    pub criterion: Vec<SplitCriterion>,
}

impl Default for TreeGrid {
    fn default() -> Self {
        Self {
            max_depth: vec![Some(3), Some(6), None],
            min_samples_split: vec![2, 5, 10],
            min_samples_leaf: vec![1, 5, 10],
            criterion: vec![SplitCriterion::Gini, SplitCriterion::Entropy],
        }
    }
}

impl TreeGrid {
    fn check(&self, name: &str) -> Result<()> {
        if self.max_depth.is_empty()
            || self.min_samples_split.is_empty()
            || self.min_samples_leaf.is_empty()
            || self.criterion.is_empty()
        {
            return Err(EvalError::EmptyGrid(name.to_string()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ForestGrid {
    pub tree: TreeGrid,
    pub n_estimators: Vec<usize>,
    pub max_features: Vec<MaxFeatures>,
}

impl Default for ForestGrid {
    fn default() -> Self {
        Self {
            tree: TreeGrid::default(),
            n_estimators: vec![10, 100, 1000],
            max_features: vec![MaxFeatures::Sqrt, MaxFeatures::Log2],
        }
    }
}

impl ForestGrid {
    fn check(&self) -> Result<()> {
        self.tree.check("random_forest")?;
        if self.n_estimators.is_empty() || self.max_features.is_empty() {
            return Err(EvalError::EmptyGrid("random_forest".to_string()));
        }
        Ok(())
    }
}

/// Search space of the boosted-tree classifier.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct BoostGrid {
    pub min_leaf_size: Vec<usize>,
    pub subsample: Vec<f64>,
    pub colsample: Vec<f64>,
    pub max_depth: Vec<u32>,
    pub learning_rate: Vec<f32>,
    pub iterations: Vec<usize>,
    /// Shuffles per column when estimating permutation importance.
    pub permutation_repeats: usize,
}

impl Default for BoostGrid {
    fn default() -> Self {
        Self {
            min_leaf_size: vec![1, 5, 10],
            subsample: vec![0.6, 0.8, 1.0],
            colsample: vec![0.6, 0.8, 1.0],
            max_depth: vec![3, 6],
            learning_rate: vec![0.01, 0.3, 0.5],
            iterations: vec![100],
            permutation_repeats: 5,
        }
    }
}

impl BoostGrid {
    fn check(&self) -> Result<()> {
        if self.min_leaf_size.is_empty()
            || self.subsample.is_empty()
            || self.colsample.is_empty()
            || self.max_depth.is_empty()
            || self.learning_rate.is_empty()
            || self.iterations.is_empty()
        {
            return Err(EvalError::EmptyGrid("gradient_boosting".to_string()));
        }
        if self.permutation_repeats == 0 {
            return Err(EvalError::InvalidConfig(
                "permutation_repeats must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ReliefConfig {
    pub n_neighbors: usize,
    /// Features with at most this many distinct values are treated as discrete.
    pub discrete_threshold: usize,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 100,
            discrete_threshold: 10,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct MutualInfoConfig {
    pub estimator: MutualInfoEstimator,
    /// Neighbour count of the kNN estimator.
    pub n_neighbors: usize,
}

impl Default for MutualInfoConfig {
    fn default() -> Self {
        Self {
            estimator: MutualInfoEstimator::Discrete,
            n_neighbors: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct LogisticConfig {
    /// Inverse L2 penalty; very large values make the fit unregularised.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1e30,
            max_iter: 100,
            tol: 1e-8,
        }
    }
}

/// Load and validate a configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<EvalConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: EvalConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_checked_in_run() {
        let cfg = EvalConfig::default();
        assert_eq!(cfg.heritability_values, vec!["70", "80", "90"]);
        assert_eq!(cfg.dataset_types.len(), 4);
        assert_eq!(cfg.active_evaluators, vec![EvaluatorKind::GradientBoosting]);
        assert_eq!(cfg.max_files_per_group, 30);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn evaluators_are_deduplicated_in_order() {
        let cfg = EvalConfig {
            active_evaluators: vec![
                EvaluatorKind::Spearman,
                EvaluatorKind::MannWhitney,
                EvaluatorKind::Spearman,
            ],
            ..EvalConfig::default()
        };
        assert_eq!(
            cfg.evaluators(),
            vec![EvaluatorKind::Spearman, EvaluatorKind::MannWhitney]
        );
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = EvalConfig::default();
        cfg.split.test_fraction = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = EvalConfig::default();
        cfg.models.decision_tree.criterion.clear();
        assert!(matches!(cfg.validate(), Err(EvalError::EmptyGrid(_))));

        let cfg = EvalConfig {
            max_files_per_group: 0,
            ..EvalConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "base_directory": "/data/gametes",
            "heritability_values": ["10"],
            "dataset_types": ["m1m2Heterogeneous"],
            "active_evaluators": ["mann_whitney", "relief_f"]
        }"#;
        let cfg: EvalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.base_directory, PathBuf::from("/data/gametes"));
        assert_eq!(cfg.dataset_types, vec![DatasetType::M1M2Heterogeneous]);
        assert_eq!(cfg.max_files_per_group, 30);
        assert_eq!(cfg.layout.label_column, "Class");
        assert_eq!(cfg.models.random_forest.n_estimators, vec![10, 100, 1000]);
    }
}
