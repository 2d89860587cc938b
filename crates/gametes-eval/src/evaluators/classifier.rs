use crate::config::{BoostGrid, ForestGrid, SplitConfig, TreeGrid};
use crate::dataset::{Dataset, Partition};
use crate::error::Result;
use crate::evaluators::{Evaluation, Evaluator, EvaluatorKind};
use crate::models::factory::{build_model, ModelParams};
use crate::models::grid_search::{boost_candidates, forest_candidates, grid_search, tree_candidates};
use crate::models::metrics::accuracy;
use crate::oracle::{self, DatasetType};
use crate::ranking::top_two_by_importance;

/// Model family and search space of a classifier evaluator.
#[derive(Debug, Clone)]
pub enum ClassifierFamily {
    /// Evaluated on `repeats` distinct folds of a shuffled K-fold.
    DecisionTree { grid: TreeGrid, repeats: usize },
    RandomForest(ForestGrid),
    GradientBoosting(BoostGrid),
}

impl ClassifierFamily {
    fn kind(&self) -> EvaluatorKind {
        match self {
            ClassifierFamily::DecisionTree { .. } => EvaluatorKind::DecisionTree,
            ClassifierFamily::RandomForest(_) => EvaluatorKind::RandomForest,
            ClassifierFamily::GradientBoosting(_) => EvaluatorKind::GradientBoosting,
        }
    }

    fn candidates(&self, seed: u64) -> Vec<ModelParams> {
        match self {
            ClassifierFamily::DecisionTree { grid, .. } => tree_candidates(grid, seed),
            ClassifierFamily::RandomForest(grid) => forest_candidates(grid, seed),
            ClassifierFamily::GradientBoosting(grid) => boost_candidates(grid, seed),
        }
    }
}

/// Result of tuning, refitting and scoring on one partition.
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub recovered: bool,
    pub accuracy: f64,
    pub top_features: Vec<String>,
}

/// Tuned tree model evaluator.
pub struct ClassifierEvaluator {
    family: ClassifierFamily,
    split: SplitConfig,
    seed: u64,
}

impl ClassifierEvaluator {
    pub fn new(family: ClassifierFamily, split: SplitConfig, seed: u64) -> Self {
        ClassifierEvaluator { family, split, seed }
    }

    /// Grid search on the training rows, refit the winner on all of them,
    /// score the held-out rows and check the two most important features.
    pub fn evaluate_partition(
        &self,
        dataset: &Dataset,
        partition: &Partition,
        dataset_type: DatasetType,
    ) -> Result<PartitionOutcome> {
        let train = dataset.select_rows(&partition.train);
        let test = dataset.select_rows(&partition.test);
        let train_labels = train.labels();

        let candidates = self.family.candidates(self.seed);
        let search = grid_search(&candidates, &train.x, &train_labels, self.split.cv_folds)?;

        let mut model = build_model(&search.best);
        model.fit(&train.x, &train_labels)?;
        let predicted = model.predict(&test.x)?;
        let held_out = accuracy(&test.labels(), &predicted);

        let importances = model.feature_importances()?;
        let top_features: Vec<String> = top_two_by_importance(&importances)
            .into_iter()
            .map(|idx| dataset.feature_names[idx].clone())
            .collect();
        let recovered = oracle::recovered(&top_features[..], dataset_type)?;

        log::debug!(
            "{}: cv score {:.4}, held-out accuracy {:.4}, top features {:?}",
            model.name(),
            search.best_score,
            held_out,
            top_features
        );
        Ok(PartitionOutcome {
            recovered,
            accuracy: held_out,
            top_features,
        })
    }
}

impl Evaluator for ClassifierEvaluator {
    fn kind(&self) -> EvaluatorKind {
        self.family.kind()
    }

    fn evaluate(&self, dataset: &Dataset, dataset_type: DatasetType) -> Result<Evaluation> {
        match &self.family {
            ClassifierFamily::DecisionTree { repeats, .. } => {
                let folds = dataset.k_fold(*repeats, self.seed);
                let mut hits = 0usize;
                let mut accuracy_sum = 0.0;
                let mut top_features = Vec::new();
                for fold in &folds {
                    let outcome = self.evaluate_partition(dataset, fold, dataset_type)?;
                    hits += usize::from(outcome.recovered);
                    accuracy_sum += outcome.accuracy;
                    top_features = outcome.top_features;
                }
                let n = folds.len().max(1);
                // Majority of folds, an exact half counts as a miss.
                Ok(Evaluation {
                    recovered: u8::from(hits * 2 > n),
                    accuracy: Some(accuracy_sum / n as f64),
                    top_features,
                })
            }
            _ => {
                let partition = dataset.train_test_split(self.split.test_fraction, self.seed);
                let outcome = self.evaluate_partition(dataset, &partition, dataset_type)?;
                Ok(Evaluation {
                    recovered: u8::from(outcome.recovered),
                    accuracy: Some(outcome.accuracy),
                    top_features: outcome.top_features,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tree::SplitCriterion;
    use ndarray::{Array1, Array2};

    // M0P0 decides the class; N0 and N1 cycle independently of it.
    fn separable(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 3), |(r, c)| match c {
            0 => ((r * 3) % 4) as f64,
            1 => (r % 2) as f64 * 2.0,
            _ => ((r * 5) % 3) as f64,
        });
        let y = Array1::from_shape_fn(n, |r| (r % 2) as u8);
        let names = vec!["N0".to_string(), "M0P0".to_string(), "N1".to_string()];
        Dataset::new(x, y, names).unwrap()
    }

    fn small_tree_grid() -> TreeGrid {
        TreeGrid {
            max_depth: vec![Some(3), None],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1],
            criterion: vec![SplitCriterion::Gini],
        }
    }

    #[test]
    fn decision_tree_recovers_separable_locus() {
        let evaluator = ClassifierEvaluator::new(
            ClassifierFamily::DecisionTree {
                grid: small_tree_grid(),
                repeats: 5,
            },
            SplitConfig::default(),
            42,
        );
        let evaluation = evaluator.evaluate(&separable(50), DatasetType::M1).unwrap();
        assert_eq!(evaluation.recovered, 1);
        assert_eq!(evaluation.accuracy, Some(1.0));
        assert_eq!(evaluation.top_features[0], "M0P0");
    }

    #[test]
    fn random_forest_reports_accuracy() {
        let grid = ForestGrid {
            tree: small_tree_grid(),
            n_estimators: vec![10],
            max_features: vec![crate::models::tree::MaxFeatures::Sqrt],
        };
        let evaluator = ClassifierEvaluator::new(
            ClassifierFamily::RandomForest(grid),
            SplitConfig::default(),
            42,
        );
        let evaluation = evaluator.evaluate(&separable(60), DatasetType::M1).unwrap();
        assert_eq!(evaluator.kind(), EvaluatorKind::RandomForest);
        assert_eq!(evaluation.top_features.len(), 2);
        let acc = evaluation.accuracy.unwrap();
        assert!((0.0..=1.0).contains(&acc));
    }
}
