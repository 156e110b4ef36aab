//! Group filter: select alerts and tracker rows by (Rule ID, Population Group).
//!
//! RULE: Population Group always compares exactly.
//! Rule ID compares upper-cased only when the variant says so.

use crate::{alert::AlertRecord, tracker::TrackerRow};

pub fn rule_matches(candidate: &str, rule_id: &str, case_insensitive_rule: bool) -> bool {
    if case_insensitive_rule {
        candidate.to_uppercase() == rule_id.to_uppercase()
    } else {
        candidate == rule_id
    }
}

/// Alerts belonging to one (rule, population group) pair. May be empty.
pub fn group<'a>(
    rows: &'a [AlertRecord],
    rule_id: &str,
    population_group: &str,
    case_insensitive_rule: bool,
) -> Vec<&'a AlertRecord> {
    rows.iter()
        .filter(|a| {
            a.population_group == population_group
                && rule_matches(&a.rule_id, rule_id, case_insensitive_rule)
        })
        .collect()
}

/// A run of tracker rows sharing one (rule, population group) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerGroup {
    /// Key as spelled by the group's first row.
    pub rule_id: String,
    pub population_group: String,
    /// Indices into the tracker, in tracker order.
    pub row_indices: Vec<usize>,
}

/// Partition tracker rows into groups, keyed by first appearance.
pub fn tracker_groups(rows: &[TrackerRow], case_insensitive_rule: bool) -> Vec<TrackerGroup> {
    let mut groups: Vec<TrackerGroup> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let existing = groups.iter_mut().find(|g| {
            g.population_group == row.population_group
                && rule_matches(&g.rule_id, &row.rule_id, case_insensitive_rule)
        });
        match existing {
            Some(g) => g.row_indices.push(index),
            None => groups.push(TrackerGroup {
                rule_id: row.rule_id.clone(),
                population_group: row.population_group.clone(),
                row_indices: vec![index],
            }),
        }
    }
    groups
}
