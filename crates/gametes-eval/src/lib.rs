//! gametes-eval: causal-feature recovery benchmarks for simulated SNP data.
//!
//! GAMETES simulates case/control datasets in which one locus (`M0P0`) or an
//! interacting pair (`M0P0`, `M1P0`) carries the signal. This crate loads
//! those datasets, ranks features with univariate statistics, information
//! measures, Relief-family weights and tree ensembles, and records whether
//! the top-ranked features are the simulated ones.
//!
//! The driver walks heritability × dataset-type groups strictly in order;
//! parallelism is confined to grid search and forest growing.
pub mod accumulator;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod evaluators;
pub mod feature_selection;
pub mod io;
pub mod models;
pub mod oracle;
pub mod ranking;
pub mod report;
pub mod stats;

pub use config::EvalConfig;
pub use dataset::Dataset;
pub use driver::{RunSummary, Runner};
pub use error::{EvalError, Result};
pub use evaluators::{Evaluation, Evaluator, EvaluatorKind};
pub use oracle::DatasetType;
