//! Evaluators turn one dataset into one recovery indicator.
//!
//! Rankers score every feature with a filter statistic and check the head of
//! the ranking; classifiers tune a tree model, measure held-out accuracy and
//! check the two most important features.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EvalConfig;
use crate::dataset::Dataset;
use crate::error::{EvalError, Result};
use crate::oracle::DatasetType;

pub mod classifier;
pub mod ranker;

pub use classifier::{ClassifierEvaluator, ClassifierFamily};
pub use ranker::{RankerEvaluator, ScoreMethod};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    MannWhitney,
    Pearson,
    Spearman,
    LogisticRegression,
    MutualInformation,
    ReliefF,
    MultiSurf,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

impl EvaluatorKind {
    pub const ALL: [EvaluatorKind; 10] = [
        EvaluatorKind::MannWhitney,
        EvaluatorKind::Pearson,
        EvaluatorKind::Spearman,
        EvaluatorKind::LogisticRegression,
        EvaluatorKind::MutualInformation,
        EvaluatorKind::ReliefF,
        EvaluatorKind::MultiSurf,
        EvaluatorKind::DecisionTree,
        EvaluatorKind::RandomForest,
        EvaluatorKind::GradientBoosting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::MannWhitney => "mann_whitney",
            EvaluatorKind::Pearson => "pearson",
            EvaluatorKind::Spearman => "spearman",
            EvaluatorKind::LogisticRegression => "logistic_regression",
            EvaluatorKind::MutualInformation => "mutual_information",
            EvaluatorKind::ReliefF => "relief_f",
            EvaluatorKind::MultiSurf => "multi_surf",
            EvaluatorKind::DecisionTree => "decision_tree",
            EvaluatorKind::RandomForest => "random_forest",
            EvaluatorKind::GradientBoosting => "gradient_boosting",
        }
    }

    /// File stem the recovery indicators are written to.
    pub fn recovery_output(&self) -> &'static str {
        match self {
            EvaluatorKind::MannWhitney => "mwOutput",
            EvaluatorKind::Pearson => "pcOutput",
            EvaluatorKind::Spearman => "scOutput",
            EvaluatorKind::LogisticRegression => "lrOutput",
            EvaluatorKind::MutualInformation => "miOutput",
            EvaluatorKind::ReliefF => "rfOutput",
            EvaluatorKind::MultiSurf => "msOutput",
            EvaluatorKind::DecisionTree => "dtPositiveOutput",
            EvaluatorKind::RandomForest => "randForestPositiveOutput",
            EvaluatorKind::GradientBoosting => "xgPositiveOutput",
        }
    }

    /// File stem of the held-out accuracies, classifiers only.
    pub fn accuracy_output(&self) -> Option<&'static str> {
        match self {
            EvaluatorKind::DecisionTree => Some("dtAccuracyOutput"),
            EvaluatorKind::RandomForest => Some("randForestAccuracyOutput"),
            EvaluatorKind::GradientBoosting => Some("xgAccuracyOutput"),
            _ => None,
        }
    }

    pub fn is_classifier(&self) -> bool {
        self.accuracy_output().is_some()
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluatorKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "mann_whitney" | "mw" => EvaluatorKind::MannWhitney,
            "pearson" | "pc" => EvaluatorKind::Pearson,
            "spearman" | "sc" => EvaluatorKind::Spearman,
            "logistic_regression" | "lr" => EvaluatorKind::LogisticRegression,
            "mutual_information" | "mi" => EvaluatorKind::MutualInformation,
            "relief_f" | "relieff" => EvaluatorKind::ReliefF,
            "multi_surf" | "multisurf" => EvaluatorKind::MultiSurf,
            "decision_tree" | "dt" => EvaluatorKind::DecisionTree,
            "random_forest" | "rf" => EvaluatorKind::RandomForest,
            "gradient_boosting" | "xgboost" | "xgb" | "gbdt" => EvaluatorKind::GradientBoosting,
            _ => return Err(EvalError::UnknownEvaluator(s.to_string())),
        };
        Ok(kind)
    }
}

/// Outcome of one evaluator on one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// 1 when the top features match the ground truth.
    pub recovered: u8,
    /// Held-out accuracy, classifiers only.
    pub accuracy: Option<f64>,
    /// The features the oracle was applied to, best first.
    pub top_features: Vec<String>,
}

pub trait Evaluator: Send + Sync {
    fn kind(&self) -> EvaluatorKind;

    fn evaluate(&self, dataset: &Dataset, dataset_type: DatasetType) -> Result<Evaluation>;
}

/// Build the evaluator for `kind` from the run configuration.
pub fn build_evaluator(kind: EvaluatorKind, config: &EvalConfig) -> Box<dyn Evaluator> {
    match kind {
        EvaluatorKind::MannWhitney => Box::new(RankerEvaluator::new(kind, ScoreMethod::MannWhitney)),
        EvaluatorKind::Pearson => Box::new(RankerEvaluator::new(kind, ScoreMethod::Pearson)),
        EvaluatorKind::Spearman => Box::new(RankerEvaluator::new(kind, ScoreMethod::Spearman)),
        EvaluatorKind::LogisticRegression => Box::new(RankerEvaluator::new(
            kind,
            ScoreMethod::Logistic(config.logistic.clone()),
        )),
        EvaluatorKind::MutualInformation => Box::new(RankerEvaluator::new(
            kind,
            ScoreMethod::MutualInformation(config.mutual_information.clone(), config.seed),
        )),
        EvaluatorKind::ReliefF => Box::new(RankerEvaluator::new(
            kind,
            ScoreMethod::ReliefF(config.relief.clone()),
        )),
        EvaluatorKind::MultiSurf => Box::new(RankerEvaluator::new(
            kind,
            ScoreMethod::MultiSurf(config.relief.clone()),
        )),
        EvaluatorKind::DecisionTree => Box::new(ClassifierEvaluator::new(
            ClassifierFamily::DecisionTree {
                grid: config.models.decision_tree.clone(),
                repeats: config.models.decision_tree_repeats,
            },
            config.split.clone(),
            config.seed,
        )),
        EvaluatorKind::RandomForest => Box::new(ClassifierEvaluator::new(
            ClassifierFamily::RandomForest(config.models.random_forest.clone()),
            config.split.clone(),
            config.seed,
        )),
        EvaluatorKind::GradientBoosting => Box::new(ClassifierEvaluator::new(
            ClassifierFamily::GradientBoosting(config.models.gradient_boosting.clone()),
            config.split.clone(),
            config.seed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("mann-whitney".parse::<EvaluatorKind>().unwrap(), EvaluatorKind::MannWhitney);
        assert_eq!("XGBoost".parse::<EvaluatorKind>().unwrap(), EvaluatorKind::GradientBoosting);
        assert!("svm".parse::<EvaluatorKind>().is_err());
        for kind in EvaluatorKind::ALL {
            assert_eq!(kind.as_str().parse::<EvaluatorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn output_names() {
        assert_eq!(EvaluatorKind::ReliefF.recovery_output(), "rfOutput");
        assert_eq!(EvaluatorKind::RandomForest.recovery_output(), "randForestPositiveOutput");
        assert_eq!(EvaluatorKind::GradientBoosting.accuracy_output(), Some("xgAccuracyOutput"));
        assert_eq!(EvaluatorKind::Spearman.accuracy_output(), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EvaluatorKind::MultiSurf).unwrap();
        assert_eq!(json, "\"multi_surf\"");
    }

    #[test]
    fn factory_preserves_kind() {
        let config = EvalConfig::default();
        for kind in EvaluatorKind::ALL {
            assert_eq!(build_evaluator(kind, &config).kind(), kind);
        }
    }
}
