//! Variant selection: one best configuration per model.
//!
//! Variants are ordered by Recall (descending), then Cost (ascending), then
//! F1-Score (descending). Rows tied on all three keys keep their input order,
//! so the earliest one is selected.

use crate::error::{InputError, Result};
use crate::types::{ResultRow, ResultTable, SummaryRow};
use std::cmp::Ordering;
use tracing::debug;

/// Ordering used to pick the best variant. `Less` means "better".
pub fn compare_variants(a: &ResultRow, b: &ResultRow) -> Ordering {
    b.recall
        .partial_cmp(&a.recall)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal))
        .then_with(|| b.f1_score.partial_cmp(&a.f1_score).unwrap_or(Ordering::Equal))
}

/// Best variant of a single table, `None` if the table is empty.
pub fn best_variant(table: &ResultTable) -> Option<&ResultRow> {
    // `min_by` returns the first of several equal minima, which is the same
    // row a stable sort would put first.
    table.rows().iter().min_by(|a, b| compare_variants(a, b))
}

/// Reduce each table to its best variant and flag the cheapest ones.
///
/// Produces exactly one [`SummaryRow`] per table, in table order. A table
/// without rows is an error. `is_best_cost` is set on every row whose cost
/// equals the minimum cost of the selected rows.
pub fn generate_model_summary(tables: &[ResultTable]) -> Result<Vec<SummaryRow>> {
    let mut selected = Vec::with_capacity(tables.len());
    for (index, table) in tables.iter().enumerate() {
        let best = best_variant(table).ok_or(InputError::EmptyTable { index })?;
        debug!(
            model = %best.model,
            variant = best.variant.as_deref().unwrap_or("-"),
            candidates = table.len(),
            recall = best.recall,
            cost = best.cost,
            "Selected best variant"
        );
        selected.push(best.clone());
    }

    let min_cost = selected
        .iter()
        .map(|r| r.cost)
        .fold(f64::INFINITY, f64::min);

    Ok(selected
        .into_iter()
        .map(|row| SummaryRow {
            is_best_cost: row.cost == min_cost,
            row,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompareError;

    fn variant(model: &str, name: &str, recall: f64, cost: f64, f1: f64) -> ResultRow {
        ResultRow::new(model, 0.8, 0.8, recall, f1, cost)
            .unwrap()
            .with_variant(name)
    }

    fn table(rows: Vec<ResultRow>) -> ResultTable {
        ResultTable::new(rows).unwrap()
    }

    #[test]
    fn test_highest_recall_wins() {
        let t = table(vec![
            variant("rf", "a", 0.70, 10.0, 0.9),
            variant("rf", "b", 0.85, 90.0, 0.6),
            variant("rf", "c", 0.80, 5.0, 0.9),
        ]);
        assert_eq!(best_variant(&t).unwrap().variant.as_deref(), Some("b"));
    }

    #[test]
    fn test_lower_cost_breaks_recall_tie() {
        let t = table(vec![
            variant("rf", "a", 0.85, 40.0, 0.9),
            variant("rf", "b", 0.85, 20.0, 0.7),
        ]);
        assert_eq!(best_variant(&t).unwrap().variant.as_deref(), Some("b"));
    }

    #[test]
    fn test_higher_f1_breaks_recall_and_cost_tie() {
        let t = table(vec![
            variant("rf", "a", 0.85, 20.0, 0.70),
            variant("rf", "b", 0.85, 20.0, 0.75),
        ]);
        assert_eq!(best_variant(&t).unwrap().variant.as_deref(), Some("b"));
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        let t = table(vec![
            variant("rf", "first", 0.85, 20.0, 0.75),
            variant("rf", "second", 0.85, 20.0, 0.75),
            variant("rf", "third", 0.85, 20.0, 0.75),
        ]);
        assert_eq!(best_variant(&t).unwrap().variant.as_deref(), Some("first"));
    }

    #[test]
    fn test_single_row_table() {
        let only = variant("svm", "only", 0.5, 3.0, 0.5);
        let summary = generate_model_summary(&[table(vec![only.clone()])]).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].row, only);
        assert!(summary[0].is_best_cost);
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let tables = vec![
            table(vec![variant("rf", "a", 0.8, 1.0, 0.8)]),
            ResultTable::default(),
        ];
        let err = generate_model_summary(&tables).unwrap_err();
        assert!(matches!(
            err,
            CompareError::Input(InputError::EmptyTable { index: 1 })
        ));
    }

    #[test]
    fn test_no_tables_gives_empty_summary() {
        assert!(generate_model_summary(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_one_summary_row_per_table_in_order() {
        let tables = vec![
            table(vec![
                variant("rf", "a", 0.8, 30.0, 0.8),
                variant("rf", "b", 0.9, 60.0, 0.8),
            ]),
            table(vec![variant("lr", "a", 0.7, 10.0, 0.7)]),
            table(vec![
                variant("xgb", "a", 0.6, 15.0, 0.7),
                variant("xgb", "b", 0.6, 12.0, 0.7),
            ]),
        ];
        let summary = generate_model_summary(&tables).unwrap();
        let picked: Vec<_> = summary
            .iter()
            .map(|s| (s.row.model.as_str(), s.row.variant.as_deref().unwrap()))
            .collect();
        assert_eq!(picked, vec![("rf", "b"), ("lr", "a"), ("xgb", "b")]);

        let flags: Vec<_> = summary.iter().map(|s| s.is_best_cost).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_best_cost_ties_are_all_flagged() {
        let tables = vec![
            table(vec![variant("a", "v", 0.8, 10.0, 0.8)]),
            table(vec![variant("b", "v", 0.7, 10.0, 0.8)]),
            table(vec![variant("c", "v", 0.9, 11.0, 0.8)]),
        ];
        let summary = generate_model_summary(&tables).unwrap();
        let flags: Vec<_> = summary.iter().map(|s| s.is_best_cost).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let tables = vec![table(vec![
            variant("rf", "a", 0.7, 10.0, 0.9),
            variant("rf", "b", 0.9, 90.0, 0.6),
        ])];
        let before = tables.clone();
        generate_model_summary(&tables).unwrap();
        assert_eq!(tables, before);
    }
}
