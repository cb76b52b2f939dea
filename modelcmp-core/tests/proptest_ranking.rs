//! Property-based tests for variant selection and composite ranking.

use proptest::prelude::*;

use modelcmp_core::{
    DegeneratePolicy, RankingConfig, ResultRow, ResultTable, SummaryRow,
    generate_model_summary, identify_overall_best_model,
};

#[derive(Debug, Clone)]
struct Metrics {
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1: f64,
    cost: f64,
}

fn metrics() -> impl Strategy<Value = Metrics> {
    // Values on a coarse grid so ties actually happen.
    (0u32..=20, 0u32..=20, 0u32..=20, 0u32..=20, 0u32..=50).prop_map(|(a, p, r, f, c)| Metrics {
        accuracy: a as f64 / 20.0,
        precision: p as f64 / 20.0,
        recall: r as f64 / 20.0,
        f1: f as f64 / 20.0,
        cost: c as f64 * 10.0,
    })
}

fn row(model: &str, m: &Metrics) -> ResultRow {
    ResultRow::new(model, m.accuracy, m.precision, m.recall, m.f1, m.cost).unwrap()
}

fn summary_rows(models: &[Metrics]) -> Vec<SummaryRow> {
    models
        .iter()
        .enumerate()
        .map(|(i, m)| SummaryRow {
            row: row(&format!("m{i}"), m),
            is_best_cost: false,
        })
        .collect()
}

fn score_of(rows: &[SummaryRow], model: &str) -> f64 {
    identify_overall_best_model(rows, &RankingConfig::default())
        .unwrap()
        .into_iter()
        .find(|r| r.model() == model)
        .unwrap()
        .composite_score
}

// --- Variant selection properties ---

proptest! {
    #[test]
    fn one_summary_row_per_table(
        tables in prop::collection::vec(prop::collection::vec(metrics(), 1..6), 1..8),
    ) {
        let tables: Vec<ResultTable> = tables
            .iter()
            .enumerate()
            .map(|(i, variants)| {
                let name = format!("model{i}");
                ResultTable::new(variants.iter().map(|m| row(&name, m)).collect()).unwrap()
            })
            .collect();

        let summary = generate_model_summary(&tables).unwrap();
        prop_assert_eq!(summary.len(), tables.len());
        for (table, s) in tables.iter().zip(&summary) {
            prop_assert_eq!(Some(s.row.model.as_str()), table.model());
        }
    }

    #[test]
    fn selected_variant_is_not_beaten_on_recall(variants in prop::collection::vec(metrics(), 1..10)) {
        let table = ResultTable::new(variants.iter().map(|m| row("m", m)).collect()).unwrap();
        let summary = generate_model_summary(std::slice::from_ref(&table)).unwrap();
        let best = &summary[0].row;
        for other in table.rows() {
            prop_assert!(other.recall <= best.recall);
            if other.recall == best.recall {
                prop_assert!(other.cost >= best.cost);
            }
        }
    }

    #[test]
    fn full_ties_select_first_row(m in metrics(), copies in 2usize..6) {
        let rows: Vec<ResultRow> = (0..copies)
            .map(|i| row("m", &m).with_variant(format!("v{i}")))
            .collect();
        let table = ResultTable::new(rows).unwrap();
        let summary = generate_model_summary(&[table]).unwrap();
        prop_assert_eq!(summary[0].row.variant.as_deref(), Some("v0"));
    }

    #[test]
    fn best_cost_flag_matches_minimum(models in prop::collection::vec(metrics(), 1..8)) {
        let tables: Vec<ResultTable> = models
            .iter()
            .enumerate()
            .map(|(i, m)| ResultTable::new(vec![row(&format!("m{i}"), m)]).unwrap())
            .collect();
        let summary = generate_model_summary(&tables).unwrap();
        let min_cost = models.iter().map(|m| m.cost).fold(f64::INFINITY, f64::min);
        for s in &summary {
            prop_assert_eq!(s.is_best_cost, s.row.cost == min_cost);
        }
        prop_assert!(summary.iter().any(|s| s.is_best_cost));
    }
}

// --- Composite ranking properties ---

proptest! {
    #[test]
    fn scores_are_finite_and_sorted(
        models in prop::collection::vec(metrics(), 1..8),
        half in any::<bool>(),
    ) {
        let config = RankingConfig {
            degenerate_policy: if half { DegeneratePolicy::Half } else { DegeneratePolicy::Zero },
            ..RankingConfig::default()
        };
        let ranked = identify_overall_best_model(&summary_rows(&models), &config).unwrap();
        prop_assert_eq!(ranked.len(), models.len());
        for r in &ranked {
            prop_assert!(r.composite_score.is_finite());
            prop_assert!(r.composite_score >= 0.0 && r.composite_score <= 7.0 + 1e-9);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].composite_score >= pair[1].composite_score);
        }
    }

    #[test]
    fn overall_best_flags_exactly_the_maximum(models in prop::collection::vec(metrics(), 1..8)) {
        let ranked = identify_overall_best_model(&summary_rows(&models), &RankingConfig::default()).unwrap();
        let max = ranked.iter().map(|r| r.composite_score).fold(f64::NEG_INFINITY, f64::max);
        for r in &ranked {
            prop_assert_eq!(r.is_overall_best, r.composite_score == max);
        }
        prop_assert!(ranked[0].is_overall_best);
    }

    #[test]
    fn score_non_decreasing_in_recall(
        models in prop::collection::vec(metrics(), 2..6),
        bump in 1u32..=20,
    ) {
        let rows = summary_rows(&models);
        let before = score_of(&rows, "m0");

        let mut improved = models.clone();
        improved[0].recall = (improved[0].recall + bump as f64 / 20.0).min(1.0);
        let after = score_of(&summary_rows(&improved), "m0");
        prop_assert!(after >= before - 1e-9, "{} < {}", after, before);
    }

    #[test]
    fn score_non_decreasing_in_accuracy(
        models in prop::collection::vec(metrics(), 2..6),
        bump in 1u32..=20,
    ) {
        let before = score_of(&summary_rows(&models), "m0");
        let mut improved = models.clone();
        improved[0].accuracy = (improved[0].accuracy + bump as f64 / 20.0).min(1.0);
        let after = score_of(&summary_rows(&improved), "m0");
        prop_assert!(after >= before - 1e-9, "{} < {}", after, before);
    }

    #[test]
    fn score_non_decreasing_in_precision(
        models in prop::collection::vec(metrics(), 2..6),
        bump in 1u32..=20,
    ) {
        let before = score_of(&summary_rows(&models), "m0");
        let mut improved = models.clone();
        improved[0].precision = (improved[0].precision + bump as f64 / 20.0).min(1.0);
        let after = score_of(&summary_rows(&improved), "m0");
        prop_assert!(after >= before - 1e-9, "{} < {}", after, before);
    }

    #[test]
    fn score_non_decreasing_in_f1(
        models in prop::collection::vec(metrics(), 2..6),
        bump in 1u32..=20,
    ) {
        let before = score_of(&summary_rows(&models), "m0");
        let mut improved = models.clone();
        improved[0].f1 = (improved[0].f1 + bump as f64 / 20.0).min(1.0);
        let after = score_of(&summary_rows(&improved), "m0");
        prop_assert!(after >= before - 1e-9, "{} < {}", after, before);
    }

    #[test]
    fn score_non_increasing_in_cost(
        models in prop::collection::vec(metrics(), 2..6),
        extra in 1u32..=50,
    ) {
        let before = score_of(&summary_rows(&models), "m0");
        let mut pricier = models.clone();
        pricier[0].cost += extra as f64 * 10.0;
        let after = score_of(&summary_rows(&pricier), "m0");
        prop_assert!(after <= before + 1e-9, "{} > {}", after, before);
    }
}
