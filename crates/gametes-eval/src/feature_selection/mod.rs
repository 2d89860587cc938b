//! Filter-style feature scoring.
//!
//! Each routine scores every column of a feature matrix against a binary class
//! vector independently of any classifier. The univariate tests return p-values,
//! the information and Relief family return weights where larger is better.
pub mod logistic;
pub mod mutual_info;
pub mod relief;
pub mod univariate_selection;

pub use logistic::{logistic_pvalues, LogisticFit};
pub use mutual_info::{mutual_information, MutualInfoEstimator};
pub use relief::{multisurf, relief_f};
pub use univariate_selection::{mann_whitney_pvalues, pearson_pvalues, spearman_pvalues};
