//! Threshold predicate: operator boundaries, coercion, and operator errors.

use tuning_core::{
    alert::{AlertRecord, AlertTable},
    error::TuningError,
    predicate::{evaluate, Operator, ThresholdCondition},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn alert(id: &str, value: &str) -> AlertRecord {
    AlertRecord::new("R1", "G1", "Interesting")
        .with_alert_id(id)
        .with_field("Occurrence_Parameter", value)
}

fn ids(rows: &[&AlertRecord]) -> Vec<String> {
    rows.iter()
        .map(|a| a.alert_id.clone().unwrap_or_default())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// A value equal to the threshold passes >= and <=, fails > and <.
#[test]
fn boundary_value_respects_operator_inclusivity() {
    let table = AlertTable::new(vec![alert("at", "5")]);
    let rows: Vec<&AlertRecord> = table.alerts().iter().collect();
    let field = table.parameter_field("Occurrence_Parameter").unwrap();

    let expected = [(">=", 1), ("<=", 1), (">", 0), ("<", 0)];
    for (op, count) in expected {
        let matched = evaluate(&rows, field, op, 5.0).unwrap();
        assert_eq!(
            matched.len(),
            count,
            "operator {op} on a value equal to the threshold"
        );
    }
}

#[test]
fn evaluate_returns_subset_in_input_order() {
    let table = AlertTable::new(vec![
        alert("a1", "10"),
        alert("a2", "2"),
        alert("a3", "7"),
        alert("a4", "5"),
    ]);
    let rows: Vec<&AlertRecord> = table.alerts().iter().collect();
    let field = table.parameter_field("Occurrence_Parameter").unwrap();

    let matched = evaluate(&rows, field, ">", 5.0).unwrap();
    assert_eq!(ids(&matched), vec!["a1", "a3"]);

    // Inputs are untouched.
    assert_eq!(rows.len(), 4);
}

/// Non-numeric values match neither a condition nor its opposite.
#[test]
fn non_numeric_values_never_match() {
    let table = AlertTable::new(vec![alert("num", "3"), alert("txt", "bad"), alert("blank", "")]);
    let rows: Vec<&AlertRecord> = table.alerts().iter().collect();
    let field = table.parameter_field("Occurrence_Parameter").unwrap();

    let ge = evaluate(&rows, field, ">=", 0.0).unwrap();
    let lt = evaluate(&rows, field, "<", 0.0).unwrap();
    assert_eq!(ids(&ge), vec!["num"]);
    assert!(lt.is_empty(), "no value is negative; got {:?}", ids(&lt));
}

#[test]
fn unknown_operator_is_a_configuration_error() {
    let table = AlertTable::new(vec![alert("a1", "3")]);
    let rows: Vec<&AlertRecord> = table.alerts().iter().collect();
    let field = table.parameter_field("Occurrence_Parameter").unwrap();

    let err = evaluate(&rows, field, "=", 3.0).unwrap_err();
    match err {
        TuningError::UnknownOperator { operator } => assert_eq!(operator, "="),
        other => panic!("expected UnknownOperator, got {other}"),
    }
}

#[test]
fn decimal_thresholds_compare_numerically() {
    let condition = ThresholdCondition::new("Occurrence_Parameter", Operator::Lt, 2.5);
    assert!(condition.matches(&alert("a", "2.49")));
    assert!(!condition.matches(&alert("b", "2.5")));
    assert!(!condition.matches(&alert("c", "10")));
}
