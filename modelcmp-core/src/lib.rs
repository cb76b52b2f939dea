//! # modelcmp-core — best-variant selection and composite model ranking
//!
//! Takes per-model tables of evaluation metrics (Accuracy, Precision, Recall,
//! F1-Score, Cost) and
//! 1. picks each model's best configuration variant ([`selector`]), then
//! 2. ranks the models by a weighted sum of min-max normalized metrics
//!    ([`ranker`]).
//!
//! Both stages are pure functions over borrowed input. Loading files and
//! drawing charts belong to the `modelcmp` binary.

pub mod columns;
pub mod config;
pub mod error;
pub mod ranker;
pub mod selector;
pub mod types;

// Re-exports
pub use config::{CompareConfig, DegeneratePolicy, MetricWeights, RankingConfig};
pub use error::{CompareError, ComputationError, ConfigError, InputError, Result};
pub use ranker::{NormalizedScores, identify_overall_best_model, normalized_scores};
pub use selector::{best_variant, generate_model_summary};
pub use types::{Metric, RankedRow, ResultRow, ResultTable, SummaryRow};

/// Run both stages: select each table's best variant, then rank the models.
pub fn compare(tables: &[ResultTable], config: &RankingConfig) -> Result<Vec<RankedRow>> {
    let summary = generate_model_summary(tables)?;
    identify_overall_best_model(&summary, config)
}
