//! Composite ranking of per-model best variants.
//!
//! Each metric is min-max normalized across the compared models (cost is
//! inverted so the cheapest model scores 1.0), multiplied by its weight and
//! summed. When all models share the same value for a metric the range is
//! degenerate and [`DegeneratePolicy`] decides the substituted value.

use crate::config::{DegeneratePolicy, MetricWeights, RankingConfig};
use crate::error::{ComputationError, InputError, Result};
use crate::types::{Metric, RankedRow, SummaryRow};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Normalized metric values of one model, each in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScores {
    pub model: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub cost: f64,
}

impl NormalizedScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1Score => self.f1_score,
            Metric::Cost => self.cost,
        }
    }

    /// Weighted sum over all five metrics.
    pub fn composite(&self, weights: &MetricWeights) -> f64 {
        Metric::ALL
            .iter()
            .map(|m| weights.weight(*m) * self.get(*m))
            .sum()
    }
}

/// Min-max normalize one metric across all rows.
fn normalize_metric(
    rows: &[SummaryRow],
    metric: Metric,
    policy: DegeneratePolicy,
) -> Result<Vec<f64>> {
    let values: Vec<f64> = rows.iter().map(|r| r.row.metric(metric)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return match policy.fallback() {
            Some(fallback) => {
                if rows.len() > 1 {
                    warn!(%metric, value = min, %policy, "Degenerate normalization range, using fallback");
                }
                Ok(vec![fallback; values.len()])
            }
            None => Err(ComputationError::DegenerateRange { metric, value: min }.into()),
        };
    }

    let range = max - min;
    Ok(values
        .into_iter()
        .map(|v| {
            let ratio = (v - min) / range;
            if metric.lower_is_better() {
                1.0 - ratio
            } else {
                ratio
            }
        })
        .collect())
}

/// Per-model normalized values, in input order.
pub fn normalized_scores(
    rows: &[SummaryRow],
    policy: DegeneratePolicy,
) -> Result<Vec<NormalizedScores>> {
    if rows.is_empty() {
        return Err(InputError::NoModels.into());
    }

    let accuracy = normalize_metric(rows, Metric::Accuracy, policy)?;
    let precision = normalize_metric(rows, Metric::Precision, policy)?;
    let recall = normalize_metric(rows, Metric::Recall, policy)?;
    let f1_score = normalize_metric(rows, Metric::F1Score, policy)?;
    let cost = normalize_metric(rows, Metric::Cost, policy)?;

    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, r)| NormalizedScores {
            model: r.row.model.clone(),
            accuracy: accuracy[i],
            precision: precision[i],
            recall: recall[i],
            f1_score: f1_score[i],
            cost: cost[i],
        })
        .collect())
}

/// Score every model, flag the best and sort by score descending.
///
/// Ties on the composite score keep input order and are all flagged
/// `is_overall_best`.
pub fn identify_overall_best_model(
    rows: &[SummaryRow],
    config: &RankingConfig,
) -> Result<Vec<RankedRow>> {
    config.validate()?;
    let normalized = normalized_scores(rows, config.degenerate_policy)?;

    let scores: Vec<f64> = normalized
        .iter()
        .map(|n| n.composite(&config.weights))
        .collect();
    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut ranked: Vec<RankedRow> = rows
        .iter()
        .zip(scores)
        .map(|(summary, score)| {
            debug!(model = %summary.row.model, score, "Composite score");
            RankedRow {
                summary: summary.clone(),
                composite_score: score,
                is_overall_best: score == max_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(Ordering::Equal)
    });

    if let Some(best) = ranked.first() {
        info!(
            model = %best.model(),
            score = best.composite_score,
            ties = ranked.iter().filter(|r| r.is_overall_best).count(),
            "Overall best model"
        );
    }

    Ok(ranked)
}
