use ndarray::Array1;

use crate::config::{LogisticConfig, MutualInfoConfig, ReliefConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::evaluators::{Evaluation, Evaluator, EvaluatorKind};
use crate::feature_selection::{
    logistic_pvalues, mann_whitney_pvalues, multisurf, mutual_information, pearson_pvalues,
    relief_f, spearman_pvalues,
};
use crate::oracle::DatasetType;
use crate::ranking::{FeatureRanking, ScoreDirection};

/// Per-feature scoring statistic of a ranking evaluator.
#[derive(Debug, Clone)]
pub enum ScoreMethod {
    MannWhitney,
    Pearson,
    Spearman,
    Logistic(LogisticConfig),
    /// Estimator settings and the seed of the kNN jitter.
    MutualInformation(MutualInfoConfig, u64),
    ReliefF(ReliefConfig),
    MultiSurf(ReliefConfig),
}

impl ScoreMethod {
    pub fn direction(&self) -> ScoreDirection {
        match self {
            ScoreMethod::MannWhitney
            | ScoreMethod::Pearson
            | ScoreMethod::Spearman
            | ScoreMethod::Logistic(_) => ScoreDirection::LowerIsBetter,
            ScoreMethod::MutualInformation(..) | ScoreMethod::ReliefF(_) | ScoreMethod::MultiSurf(_) => {
                ScoreDirection::HigherIsBetter
            }
        }
    }

    /// One score per feature column, in column order.
    pub fn scores(&self, dataset: &Dataset) -> Array1<f64> {
        let y = dataset.labels();
        let x = &dataset.x;
        match self {
            ScoreMethod::MannWhitney => mann_whitney_pvalues(x, &y),
            ScoreMethod::Pearson => pearson_pvalues(x, &y),
            ScoreMethod::Spearman => spearman_pvalues(x, &y),
            ScoreMethod::Logistic(config) => logistic_pvalues(x, &y, config),
            ScoreMethod::MutualInformation(config, seed) => {
                mutual_information(x, &y, config, *seed)
            }
            ScoreMethod::ReliefF(config) => relief_f(x, &y, config),
            ScoreMethod::MultiSurf(config) => multisurf(x, &y, config),
        }
    }
}

/// Filter-statistic evaluator: rank all features, check the head.
pub struct RankerEvaluator {
    kind: EvaluatorKind,
    method: ScoreMethod,
}

impl RankerEvaluator {
    pub fn new(kind: EvaluatorKind, method: ScoreMethod) -> Self {
        RankerEvaluator { kind, method }
    }

    pub fn rank(&self, dataset: &Dataset) -> FeatureRanking {
        let scores = self.method.scores(dataset);
        FeatureRanking::new(&dataset.feature_names, &scores.to_vec(), self.method.direction())
    }
}

impl Evaluator for RankerEvaluator {
    fn kind(&self) -> EvaluatorKind {
        self.kind
    }

    fn evaluate(&self, dataset: &Dataset, dataset_type: DatasetType) -> Result<Evaluation> {
        let ranking = self.rank(dataset);
        let recovered = ranking.recovers(dataset_type)?;
        let top_features: Vec<String> = ranking
            .top(dataset_type.ground_truth().len())
            .into_iter()
            .map(String::from)
            .collect();

        log::debug!(
            "{}: top features {:?} -> {}",
            self.kind,
            top_features,
            if recovered { "recovered" } else { "missed" }
        );
        Ok(Evaluation {
            recovered: u8::from(recovered),
            accuracy: None,
            top_features,
        })
    }
}
