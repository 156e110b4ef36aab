//! Current metrics: baseline counts, min/max, and single-condition proposals.

use tuning_core::{
    alert::{AlertRecord, AlertTable},
    config::VariantConfig,
    current_metrics::CurrentMetricsCalculator,
    error::TuningError,
    event::PipelineEvent,
    loader::RawTable,
    tracker::{TrackerRow, TrackerTable},
    types::Disposition,
};

const FIELD: &str = "Occurrence_Parameter";

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn alert(id: &str, decision: &str, value: &str) -> AlertRecord {
    AlertRecord::new("R1", "G1", decision)
        .with_alert_id(id)
        .with_field(FIELD, value)
}

/// Four alerts: values 3, 5, 7 and one that does not coerce.
fn four_alerts() -> AlertTable {
    AlertTable::new(vec![
        alert("a1", "Not Interesting", "3"),
        alert("a2", "Interesting", "5"),
        alert("a3", "SAR Filed", "7"),
        alert("a4", "Not Interesting", "bad"),
    ])
}

fn single_row(operator: &str, threshold: f64) -> TrackerTable {
    TrackerTable::new(vec![TrackerRow::new("R1", "G1", FIELD, operator, threshold)])
}

// ── ATL ──────────────────────────────────────────────────────────────────────

#[test]
fn atl_row_counts_baseline_and_proposal() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker = single_row(">=", 5.0);

    let events = CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();
    assert!(events.is_empty());

    let m = &tracker.rows[0].metrics;
    assert_eq!(m.num_alerts_extracted, Some(4));
    assert_eq!(m.interesting_alerts, Some(1));
    assert_eq!(m.not_interesting_alerts, Some(2));
    assert_eq!(m.sars_filed, Some(1));
    assert_eq!(m.data_quality_alerts, Some(0));

    assert_eq!(m.prop_interesting_alerts, Some(1));
    assert_eq!(m.prop_sars_filed, Some(1));
    assert_eq!(m.prop_not_interesting_alerts, Some(0));

    // "bad" is ignored by min/max.
    assert_eq!(m.min_val, Some(3.0));
    assert_eq!(m.max_val, Some(7.0));
}

#[test]
fn proposal_uses_the_rows_own_operator() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker = single_row("<", 5.0);

    CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();

    let m = &tracker.rows[0].metrics;
    assert_eq!(m.prop_not_interesting_alerts, Some(1), "only a1 (3) is below 5");
    assert_eq!(m.prop_interesting_alerts, Some(0));
    assert_eq!(m.prop_sars_filed, Some(0));
}

#[test]
fn atl_rule_matching_ignores_case() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker =
        TrackerTable::new(vec![TrackerRow::new("r1", "G1", FIELD, ">=", 5.0)]);

    CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();
    assert_eq!(tracker.rows[0].metrics.num_alerts_extracted, Some(4));
}

#[test]
fn empty_group_leaves_counts_at_zero() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker =
        TrackerTable::new(vec![TrackerRow::new("R9", "G1", FIELD, ">=", 5.0)]);

    CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();

    let m = &tracker.rows[0].metrics;
    assert_eq!(m.num_alerts_extracted, Some(0));
    assert_eq!(m.prop_interesting_alerts, Some(0));
    assert_eq!(m.min_val, None, "no values, no range");
    assert_eq!(m.max_val, None);
}

// ── Missing parameter field ──────────────────────────────────────────────────

#[test]
fn missing_field_is_reported_and_skips_proposal() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker = TrackerTable::new(vec![TrackerRow::new(
        "R1",
        "G1",
        "Value_Parameter",
        ">=",
        5.0,
    )]);

    let events = CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();

    assert_eq!(
        events,
        vec![PipelineEvent::ParameterFieldMissing {
            rule_id: "R1".into(),
            population_group: "G1".into(),
            field: "Value_Parameter".into(),
            stage: "current_metrics".into(),
        }]
    );

    let m = &tracker.rows[0].metrics;
    // Baseline counts do not depend on the field.
    assert_eq!(m.num_alerts_extracted, Some(4));
    assert_eq!(m.not_interesting_alerts, Some(2));
    assert_eq!(m.min_val, None);
    assert_eq!(m.max_val, None);
    assert_eq!(m.prop_interesting_alerts, None);
    assert_eq!(m.prop_not_interesting_alerts, None);
}

#[test]
fn unknown_operator_is_fatal_even_with_missing_field() {
    let variant = VariantConfig::atl();
    let alerts = four_alerts();
    let mut tracker = TrackerTable::new(vec![TrackerRow::new(
        "R1",
        "G1",
        "Value_Parameter",
        "=>",
        5.0,
    )]);

    let err = CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap_err();
    assert!(matches!(err, TuningError::UnknownOperator { .. }));
}

// ── BTL ──────────────────────────────────────────────────────────────────────

#[test]
fn btl_counts_sampled_and_extracted_separately() {
    let variant = VariantConfig::btl();
    let sampled = AlertTable::new(vec![
        alert("s1", "Interesting", "6"),
        alert("s2", "Not Interesting", "2"),
        alert("s3", "Not Interesting", "8"),
        alert("s4", "Data Quality", "1"),
    ]);
    let extracted = AlertTable::new(
        (0..10)
            .map(|i| alert(&format!("e{i}"), "", &i.to_string()))
            .collect(),
    );
    let mut tracker = single_row(">", 5.0);

    CurrentMetricsCalculator::new(&variant, &sampled, Some(&extracted))
        .apply(&mut tracker)
        .unwrap();

    let m = &tracker.rows[0].metrics;
    assert_eq!(m.num_alerts_sampled, Some(4));
    assert_eq!(m.num_alerts_extracted, Some(10));
    assert_eq!(m.interesting_alerts, Some(1));
    assert_eq!(m.not_interesting_alerts, Some(2));
    assert_eq!(m.data_quality_alerts, Some(1));
    // BTL populations carry no SAR disposition.
    assert_eq!(m.sars_filed, None);
    assert_eq!(m.prop_sars_filed, None);

    assert_eq!(m.prop_interesting_alerts, Some(1));
    assert_eq!(m.prop_not_interesting_alerts, Some(1));
}

#[test]
fn btl_rule_matching_is_exact() {
    let variant = VariantConfig::btl();
    let alerts = four_alerts();
    let mut tracker =
        TrackerTable::new(vec![TrackerRow::new("r1", "G1", FIELD, ">=", 5.0)]);

    CurrentMetricsCalculator::new(&variant, &alerts, None)
        .apply(&mut tracker)
        .unwrap();
    assert_eq!(tracker.rows[0].metrics.num_alerts_sampled, Some(0));
    assert_eq!(
        tracker.rows[0].metrics.num_alerts_extracted, None,
        "no extracted table supplied"
    );
}

#[test]
fn undecisioned_extracted_export_loads_and_counts() {
    let raw = RawTable::from_json_str(
        "extracted",
        r#"[
        {"Alert ID": "E1", "Rule ID": "R1", "Population Group": "G1", "Occurrence_Parameter": "7"},
        {"Alert ID": "E2", "Rule ID": "R1", "Population Group": "G1", "Occurrence_Parameter": "2"},
        {"Alert ID": "E3", "Rule ID": "R1", "Population Group": "G1", "Occurrence_Parameter": "9"},
        {"Alert ID": "E4", "Rule ID": "R1", "Population Group": "G2", "Occurrence_Parameter": "1"}
    ]"#,
    )
    .unwrap();

    // The decisioned loader still insists on a Tuning Decision column.
    assert!(matches!(
        AlertTable::from_raw(&raw),
        Err(TuningError::MissingColumn { ref column, .. }) if column == "Tuning Decision"
    ));

    let extracted = AlertTable::from_extracted_raw(&raw).unwrap();
    assert_eq!(extracted.len(), 4);
    assert_eq!(
        extracted.alerts()[0].tuning_decision,
        Disposition::Other(String::new())
    );

    let variant = VariantConfig::btl();
    let sampled = four_alerts();
    let mut tracker = single_row(">=", 5.0);
    CurrentMetricsCalculator::new(&variant, &sampled, Some(&extracted))
        .apply(&mut tracker)
        .unwrap();

    let m = &tracker.rows[0].metrics;
    assert_eq!(m.num_alerts_extracted, Some(3), "only R1 / G1 rows count");
    assert_eq!(m.num_alerts_sampled, Some(4));
}

#[test]
fn extracted_export_still_needs_its_key_columns() {
    let raw = RawTable::from_json_str(
        "extracted",
        r#"[{"Alert ID": "E1", "Rule ID": "R1", "Occurrence_Parameter": "7"}]"#,
    )
    .unwrap();
    assert!(matches!(
        AlertTable::from_extracted_raw(&raw),
        Err(TuningError::MissingColumn { ref column, .. }) if column == "Population Group"
    ));
}
