//! Data model for evaluation results: raw variant rows, per-model tables and
//! the derived summary and ranked rows.
//!
//! Field names serialize to the column labels used by existing result
//! spreadsheets (`"Cost ($)"`, `"F1-Score"`, ...), so JSON output lines up with
//! the CSV contract in [`crate::columns`].

use crate::columns;
use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the five metrics that take part in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1Score,
    Cost,
}

impl Metric {
    /// All metrics in the order they are summed into the composite score.
    pub const ALL: [Metric; 5] = [
        Metric::Accuracy,
        Metric::Precision,
        Metric::Recall,
        Metric::F1Score,
        Metric::Cost,
    ];

    /// Column label used in input and output tables.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Accuracy => columns::ACCURACY,
            Metric::Precision => columns::PRECISION,
            Metric::Recall => columns::RECALL,
            Metric::F1Score => columns::F1_SCORE,
            Metric::Cost => columns::COST,
        }
    }

    /// Whether a smaller raw value is better. Only cost is minimized.
    pub fn lower_is_better(self) -> bool {
        matches!(self, Metric::Cost)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One evaluation of a model configuration variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Variant", default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F1-Score")]
    pub f1_score: f64,
    #[serde(rename = "Cost ($)")]
    pub cost: f64,
    /// Any other input columns, carried through to the output untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ResultRow {
    /// Build a validated row.
    pub fn new(
        model: impl Into<String>,
        accuracy: f64,
        precision: f64,
        recall: f64,
        f1_score: f64,
        cost: f64,
    ) -> Result<Self> {
        let row = Self {
            model: model.into(),
            variant: None,
            accuracy,
            precision,
            recall,
            f1_score,
            cost,
            extra: BTreeMap::new(),
        };
        row.validate()?;
        Ok(row)
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// Raw value of `metric` for this row.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1Score => self.f1_score,
            Metric::Cost => self.cost,
        }
    }

    /// Check that ratio metrics lie in [0, 1] and cost is a finite,
    /// non-negative amount. Rows deserialized straight from JSON bypass
    /// [`ResultRow::new`] and must be validated explicitly.
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = self
            .extra
            .keys()
            .find(|k| columns::RESERVED.contains(&k.as_str()))
        {
            return Err(InputError::ReservedColumn { column: key.clone() }.into());
        }
        for metric in Metric::ALL {
            let value = self.metric(metric);
            let (ok, expected) = if metric.lower_is_better() {
                (value.is_finite() && value >= 0.0, "[0, inf)")
            } else {
                ((0.0..=1.0).contains(&value), "[0, 1]")
            };
            if !ok {
                return Err(InputError::OutOfRange {
                    model: self.model.clone(),
                    metric,
                    value,
                    expected,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// The evaluated variants of a single model, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Build a table, validating every row and that all rows name the same
    /// model. An empty table is accepted here; selecting from it fails.
    pub fn new(rows: Vec<ResultRow>) -> Result<Self> {
        if let Some(first) = rows.first() {
            for row in &rows {
                row.validate()?;
                if row.model != first.model {
                    return Err(InputError::MixedModels {
                        expected: first.model.clone(),
                        found: row.model.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(Self { rows })
    }

    /// Group a flat list of rows into one table per model, ordered by each
    /// model's first appearance.
    pub fn split_by_model(rows: Vec<ResultRow>) -> Result<Vec<Self>> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: BTreeMap<String, Vec<ResultRow>> = BTreeMap::new();
        for row in rows {
            if !groups.contains_key(&row.model) {
                order.push(row.model.clone());
            }
            groups.entry(row.model.clone()).or_default().push(row);
        }
        order
            .into_iter()
            .map(|model| Self::new(groups.remove(&model).unwrap_or_default()))
            .collect()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Model name shared by all rows, `None` for an empty table.
    pub fn model(&self) -> Option<&str> {
        self.rows.first().map(|r| r.model.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The best variant of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(flatten)]
    pub row: ResultRow,
    /// Cost equals the lowest cost among all summary rows.
    pub is_best_cost: bool,
}

/// A summary row with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    #[serde(flatten)]
    pub summary: SummaryRow,
    #[serde(rename = "Composite Score")]
    pub composite_score: f64,
    /// Score equals the highest composite score in the comparison.
    pub is_overall_best: bool,
}

impl RankedRow {
    pub fn row(&self) -> &ResultRow {
        &self.summary.row
    }

    pub fn model(&self) -> &str {
        &self.summary.row.model
    }
}
