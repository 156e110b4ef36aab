//! Group filter: rule casing per variant, exact population groups.

use tuning_core::{
    alert::AlertRecord,
    grouping::{group, tracker_groups},
    tracker::TrackerRow,
};

fn alerts() -> Vec<AlertRecord> {
    vec![
        AlertRecord::new("ABC-1", "G1", "Interesting").with_alert_id("a1"),
        AlertRecord::new("abc-1", "G1", "Not Interesting").with_alert_id("a2"),
        AlertRecord::new("ABC-1", "g1", "Interesting").with_alert_id("a3"),
        AlertRecord::new("XYZ-9", "G1", "Interesting").with_alert_id("a4"),
    ]
}

/// ATL matching ignores Rule ID casing.
#[test]
fn case_insensitive_rule_matches_any_casing() {
    let rows = alerts();
    let matched = group(&rows, "abc-1", "G1", true);
    let ids: Vec<_> = matched.iter().filter_map(|a| a.alert_id.as_deref()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
}

/// BTL matching is exact: "abc-1" does not pick up "ABC-1".
#[test]
fn case_sensitive_rule_requires_exact_spelling() {
    let rows = alerts();
    let matched = group(&rows, "abc-1", "G1", false);
    let ids: Vec<_> = matched.iter().filter_map(|a| a.alert_id.as_deref()).collect();
    assert_eq!(ids, vec!["a2"]);
}

#[test]
fn population_group_is_always_case_sensitive() {
    let rows = alerts();
    let matched = group(&rows, "ABC-1", "G1", true);
    assert!(
        matched.iter().all(|a| a.population_group == "G1"),
        "lower-case g1 must not match G1"
    );
    assert_eq!(matched.len(), 2);
}

#[test]
fn unknown_pair_gives_empty_group() {
    let rows = alerts();
    assert!(group(&rows, "NOPE", "G1", true).is_empty());
    assert!(group(&[], "ABC-1", "G1", true).is_empty());
}

#[test]
fn tracker_rows_group_by_key_in_first_seen_order() {
    let rows = vec![
        TrackerRow::new("R1", "G1", "A", ">=", 5.0),
        TrackerRow::new("R1", "G1", "B", "<", 10.0),
        TrackerRow::new("R1", "G2", "A", ">=", 1.0),
        TrackerRow::new("R2", "G1", "A", ">", 0.0),
    ];

    let groups = tracker_groups(&rows, false);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].row_indices, vec![0, 1]);
    assert_eq!(groups[1].row_indices, vec![2]);
    assert_eq!(groups[2].row_indices, vec![3]);
}

#[test]
fn tracker_grouping_follows_rule_casing_setting() {
    let rows = vec![
        TrackerRow::new("abc-1", "G1", "A", ">=", 5.0),
        TrackerRow::new("ABC-1", "G1", "B", "<", 10.0),
    ];
    assert_eq!(tracker_groups(&rows, true).len(), 1);
    assert_eq!(tracker_groups(&rows, false).len(), 2);
}
