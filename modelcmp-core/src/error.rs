//! Error types for the modelcmp core library.
//!
//! Uses `thiserror` for structured error variants covering malformed input
//! tables, degenerate score computations and configuration problems.

use crate::types::Metric;

/// Top-level error type for the modelcmp core library.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors caused by the caller-supplied result tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Result table {index} has no rows, no variant to select")]
    EmptyTable { index: usize },

    #[error("No models to rank")]
    NoModels,

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("{metric} value {value} for model '{model}' is outside {expected}")]
    OutOfRange {
        model: String,
        metric: Metric,
        value: f64,
        expected: &'static str,
    },

    #[error("Result table mixes models '{expected}' and '{found}'")]
    MixedModels { expected: String, found: String },

    #[error("Column '{column}' is reserved for derived output")]
    ReservedColumn { column: String },
}

/// Errors raised while computing composite scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputationError {
    #[error("Degenerate normalization range for {metric}: every model has {value}")]
    DegenerateRange { metric: Metric, value: f64 },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Weight for {metric} must be finite and non-negative, got {value}")]
    InvalidWeight { metric: Metric, value: f64 },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// A type alias for results using the top-level `CompareError`.
pub type Result<T> = std::result::Result<T, CompareError>;
