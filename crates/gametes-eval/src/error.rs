use thiserror::Error;

/// Errors raised while loading datasets, ranking features or fitting models.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing label column '{0}'")]
    MissingLabelColumn(String),

    #[error("Label '{value}' at row {row} is not binary (expected 0 or 1)")]
    NonBinaryLabel { value: String, row: usize },

    #[error("Invalid value '{value}' for feature '{feature}' at row {row}")]
    InvalidValue {
        value: String,
        feature: String,
        row: usize,
    },

    #[error("Dataset has no feature columns")]
    NoFeatures,

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Ranking holds {available} features but the oracle needs {required}")]
    InsufficientFeatures { required: usize, available: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Hyper-parameter grid for {0} is empty")]
    EmptyGrid(String),

    #[error("Unknown dataset type: {0}")]
    UnknownDatasetType(String),

    #[error("Unknown evaluator: {0}")]
    UnknownEvaluator(String),

    #[error("Model has not been fitted: {0}")]
    NotFitted(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, EvalError>;
