//! End-to-end tests: parse string records through the column contract, select
//! variants and rank models.

use modelcmp_core::columns::ColumnLayout;
use modelcmp_core::{
    CompareError, InputError, RankingConfig, ResultTable, compare, generate_model_summary,
    identify_overall_best_model,
};
use pretty_assertions::assert_eq;

const RESULTS: &str = "\
Model,Variant,Accuracy,Precision,Recall,F1-Score,Cost ($)
LogisticRegression,baseline,0.80,0.71,0.62,0.66,5400
LogisticRegression,balanced,0.76,0.55,0.79,0.65,4100
LogisticRegression,threshold_0.3,0.72,0.50,0.79,0.61,4100
RandomForest,baseline,0.86,0.78,0.60,0.68,5200
RandomForest,balanced,0.84,0.66,0.74,0.70,3900
XGBoost,baseline,0.87,0.79,0.63,0.70,5000
XGBoost,smote,0.83,0.62,0.81,0.70,3700
XGBoost,smote_tuned,0.85,0.66,0.81,0.73,3700
";

fn parse(csv: &str) -> Vec<ResultTable> {
    let mut lines = csv.lines();
    let layout = ColumnLayout::resolve(lines.next().unwrap().split(',')).unwrap();
    let rows = lines
        .enumerate()
        .map(|(i, line)| {
            let fields: Vec<&str> = line.split(',').collect();
            layout.parse_row(&fields, i + 1).unwrap()
        })
        .collect();
    ResultTable::split_by_model(rows).unwrap()
}

#[test]
fn summary_picks_expected_variants() {
    let tables = parse(RESULTS);
    assert_eq!(tables.len(), 3);

    let summary = generate_model_summary(&tables).unwrap();
    let picked: Vec<(&str, &str, bool)> = summary
        .iter()
        .map(|s| {
            (
                s.row.model.as_str(),
                s.row.variant.as_deref().unwrap(),
                s.is_best_cost,
            )
        })
        .collect();
    assert_eq!(
        picked,
        vec![
            // recall tie at 0.79 and cost tie at 4100: higher F1 wins
            ("LogisticRegression", "balanced", false),
            ("RandomForest", "balanced", false),
            // recall and cost tie: smote_tuned has the higher F1
            ("XGBoost", "smote_tuned", true),
        ]
    );
}

#[test]
fn ranking_orders_models_by_composite_score() {
    let tables = parse(RESULTS);
    let ranked = compare(&tables, &RankingConfig::default()).unwrap();

    let order: Vec<&str> = ranked.iter().map(|r| r.model()).collect();
    assert_eq!(order, vec!["XGBoost", "RandomForest", "LogisticRegression"]);
    assert!(ranked[0].is_overall_best);
    assert!(!ranked[1].is_overall_best);
    assert!(!ranked[2].is_overall_best);

    // XGBoost is best on every metric among the selected variants.
    assert!((ranked[0].composite_score - 7.0).abs() < 1e-9);
    // LogisticRegression only scores on recall, which sits between the others.
    let expected = (0.79 - 0.74) / (0.81 - 0.74) * 1.5;
    assert!((ranked[2].composite_score - expected).abs() < 1e-9);
}

#[test]
fn summary_then_rank_matches_compare() {
    let tables = parse(RESULTS);
    let summary = generate_model_summary(&tables).unwrap();
    let staged = identify_overall_best_model(&summary, &RankingConfig::default()).unwrap();
    let direct = compare(&tables, &RankingConfig::default()).unwrap();
    assert_eq!(staged, direct);
}

#[test]
fn missing_column_is_reported() {
    let err = ColumnLayout::resolve("Model,Accuracy,Precision,F1-Score,Cost ($)".split(','))
        .unwrap_err();
    assert!(matches!(
        err,
        CompareError::Input(InputError::MissingColumn { ref column }) if column == "Recall"
    ));
}

#[test]
fn empty_model_table_fails_instead_of_placeholder() {
    let mut tables = parse(RESULTS);
    tables.push(ResultTable::default());
    let err = compare(&tables, &RankingConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CompareError::Input(InputError::EmptyTable { index: 3 })
    ));
}
