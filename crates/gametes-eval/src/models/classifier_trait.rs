use ndarray::Array2;

use crate::error::Result;

/// Common contract of the tree-based classifiers used by the evaluators.
///
/// Labels follow the dataset convention: 1 for cases, 0 for controls.
pub trait ClassifierModel: Send {
    fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<()>;

    /// Probability of class 1 for every row of `x`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>>;

    /// Hard labels, class 1 when its probability exceeds one half.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    /// One non-negative importance per training column.
    fn feature_importances(&self) -> Result<Vec<f64>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
