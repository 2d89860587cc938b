use crate::models::classifier_trait::ClassifierModel;
use crate::models::forest::{ForestParams, RandomForest};
use crate::models::gbdt::{BoostParams, GradientBoosting};
use crate::models::tree::{DecisionTree, TreeParams};

/// Hyper-parameters of one concrete classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelParams {
    DecisionTree(TreeParams),
    RandomForest(ForestParams),
    GradientBoosting(BoostParams),
}

/// Build a boxed, unfitted classifier from its parameters.
pub fn build_model(params: &ModelParams) -> Box<dyn ClassifierModel> {
    match params {
        ModelParams::DecisionTree(p) => Box::new(DecisionTree::new(p.clone())),
        ModelParams::RandomForest(p) => Box::new(RandomForest::new(p.clone())),
        ModelParams::GradientBoosting(p) => Box::new(GradientBoosting::new(p.clone())),
    }
}
