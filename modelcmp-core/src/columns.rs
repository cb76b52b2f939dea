//! Column contract for tabular result files.
//!
//! The labels are matched byte-for-byte, including the currency suffix on
//! `Cost ($)`. [`ColumnLayout`] maps a header row onto these labels and turns
//! string records into validated [`ResultRow`]s, so any tabular reader can feed
//! the selector without the core touching files.

use crate::error::{InputError, Result};
use crate::types::ResultRow;
use std::collections::BTreeMap;

pub const MODEL: &str = "Model";
pub const VARIANT: &str = "Variant";
pub const ACCURACY: &str = "Accuracy";
pub const PRECISION: &str = "Precision";
pub const RECALL: &str = "Recall";
pub const F1_SCORE: &str = "F1-Score";
pub const COST: &str = "Cost ($)";

pub const IS_BEST_COST: &str = "is_best_cost";
pub const COMPOSITE_SCORE: &str = "Composite Score";
pub const IS_OVERALL_BEST: &str = "is_overall_best";

/// Derived output columns; input tables may not carry them.
pub const RESERVED: [&str; 3] = [IS_BEST_COST, COMPOSITE_SCORE, IS_OVERALL_BEST];

/// Columns every input table must provide.
pub const REQUIRED: [&str; 6] = [MODEL, RECALL, COST, F1_SCORE, ACCURACY, PRECISION];

/// Positions of the known columns within a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    model: usize,
    accuracy: usize,
    precision: usize,
    recall: usize,
    f1_score: usize,
    cost: usize,
    variant: Option<usize>,
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    /// Resolve a header row. Header cells are trimmed before matching.
    pub fn resolve<'a, I>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        if let Some(reserved) = headers.iter().find(|h| RESERVED.contains(*h)) {
            return Err(InputError::ReservedColumn {
                column: reserved.to_string(),
            }
            .into());
        }
        let find = |name: &str| -> Result<usize> {
            headers.iter().position(|h| *h == name).ok_or_else(|| {
                InputError::MissingColumn {
                    column: name.to_string(),
                }
                .into()
            })
        };

        let layout = Self {
            model: find(MODEL)?,
            recall: find(RECALL)?,
            cost: find(COST)?,
            f1_score: find(F1_SCORE)?,
            accuracy: find(ACCURACY)?,
            precision: find(PRECISION)?,
            variant: headers.iter().position(|h| *h == VARIANT),
            extras: Vec::new(),
        };

        let known = [
            layout.model,
            layout.accuracy,
            layout.precision,
            layout.recall,
            layout.f1_score,
            layout.cost,
        ];
        let extras = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !known.contains(i) && Some(*i) != layout.variant)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Self { extras, ..layout })
    }

    /// Names of the pass-through columns, in header order.
    pub fn extra_columns(&self) -> impl Iterator<Item = &str> {
        self.extras.iter().map(|(_, name)| name.as_str())
    }

    pub fn has_variant(&self) -> bool {
        self.variant.is_some()
    }

    /// Parse one record. `row` is the 1-based data row number used in errors.
    pub fn parse_row(&self, fields: &[&str], row: usize) -> Result<ResultRow> {
        let model = cell(fields, self.model, MODEL, row)?;
        if model.is_empty() {
            return Err(InputError::InvalidValue {
                column: MODEL.to_string(),
                row,
                value: String::new(),
            }
            .into());
        }

        let mut result = ResultRow::new(
            model,
            number(fields, self.accuracy, ACCURACY, row)?,
            number(fields, self.precision, PRECISION, row)?,
            number(fields, self.recall, RECALL, row)?,
            number(fields, self.f1_score, F1_SCORE, row)?,
            number(fields, self.cost, COST, row)?,
        )?;

        if let Some(idx) = self.variant {
            let variant = fields.get(idx).copied().map(str::trim).unwrap_or_default();
            if !variant.is_empty() {
                result.variant = Some(variant.to_string());
            }
        }

        result.extra = self
            .extras
            .iter()
            .map(|(idx, name)| {
                let value = fields.get(*idx).copied().map(str::trim).unwrap_or_default();
                (name.clone(), serde_json::Value::String(value.to_string()))
            })
            .collect::<BTreeMap<_, _>>();

        Ok(result)
    }
}

fn cell<'a>(fields: &[&'a str], idx: usize, column: &str, row: usize) -> Result<&'a str> {
    fields.get(idx).copied().map(str::trim).ok_or_else(|| {
        InputError::InvalidValue {
            column: column.to_string(),
            row,
            value: String::new(),
        }
        .into()
    })
}

fn number(fields: &[&str], idx: usize, column: &str, row: usize) -> Result<f64> {
    let raw = cell(fields, idx, column, row)?;
    raw.parse::<f64>().map_err(|_| {
        InputError::InvalidValue {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        }
        .into()
    })
}
