//! Historical alert records and the read-only alert table.

use crate::{
    columns,
    error::{TuningError, TuningResult},
    loader::{cell, RawTable},
    types::{AlertId, Disposition},
};
use std::collections::{HashMap, HashSet};

// ── Alert record ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub alert_id: Option<AlertId>,
    pub rule_id: String,
    pub population_group: String,
    pub tuning_decision: Disposition,
    pub alert_date: Option<String>,
    /// Every other column, raw text, keyed by header.
    fields: HashMap<String, String>,
}

impl AlertRecord {
    pub fn new(rule_id: &str, population_group: &str, tuning_decision: &str) -> Self {
        Self {
            alert_id: None,
            rule_id: rule_id.to_string(),
            population_group: population_group.to_string(),
            tuning_decision: Disposition::parse(tuning_decision),
            alert_date: None,
            fields: HashMap::new(),
        }
    }

    pub fn with_alert_id(mut self, alert_id: &str) -> Self {
        self.alert_id = non_blank(alert_id);
        self
    }

    pub fn with_alert_date(mut self, alert_date: &str) -> Self {
        self.alert_date = non_blank(alert_date);
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn raw_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Numeric value of a parameter column; `None` when blank or not a number.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.raw_field(field).and_then(coerce_numeric)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Coerce a text cell to a finite number. Failures are absent, never zero.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ── Parameter field lookup ───────────────────────────────────────────────────

/// A parameter column confirmed present in an alert table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterField<'a> {
    name: &'a str,
}

impl<'a> ParameterField<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }
}

// ── Alert table ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AlertTable {
    columns: HashSet<String>,
    alerts: Vec<AlertRecord>,
}

impl AlertTable {
    /// Build a table from records; the column set is every field seen.
    pub fn new(alerts: Vec<AlertRecord>) -> Self {
        let mut columns: HashSet<String> = [
            columns::RULE_ID,
            columns::POPULATION_GROUP,
            columns::TUNING_DECISION,
            columns::ALERT_ID,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        for alert in &alerts {
            columns.extend(alert.field_names().map(str::to_string));
        }
        Self { columns, alerts }
    }

    /// A decisioned alert population: Rule ID, Population Group and
    /// Tuning Decision are required.
    pub fn from_raw(raw: &RawTable) -> TuningResult<Self> {
        raw.require_columns(&[
            columns::RULE_ID,
            columns::POPULATION_GROUP,
            columns::TUNING_DECISION,
        ])?;
        Ok(Self::collect(raw))
    }

    /// The BTL extracted population, which carries no decisions yet.
    /// A blank or absent Tuning Decision reads as `Disposition::Other("")`.
    pub fn from_extracted_raw(raw: &RawTable) -> TuningResult<Self> {
        raw.require_columns(&[columns::RULE_ID, columns::POPULATION_GROUP])?;
        Ok(Self::collect(raw))
    }

    fn collect(raw: &RawTable) -> Self {
        let key_columns = [
            columns::ALERT_ID,
            columns::RULE_ID,
            columns::POPULATION_GROUP,
            columns::TUNING_DECISION,
            columns::ALERT_DATE,
        ];

        let alerts = raw
            .rows
            .iter()
            .map(|row| {
                let fields = row
                    .iter()
                    .filter(|(k, _)| !key_columns.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                AlertRecord {
                    alert_id: non_blank(cell(row, columns::ALERT_ID)),
                    rule_id: cell(row, columns::RULE_ID).to_string(),
                    population_group: cell(row, columns::POPULATION_GROUP).to_string(),
                    tuning_decision: Disposition::parse(cell(row, columns::TUNING_DECISION)),
                    alert_date: non_blank(cell(row, columns::ALERT_DATE)),
                    fields,
                }
            })
            .collect();

        Self {
            columns: raw.columns.iter().cloned().collect(),
            alerts,
        }
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Look up a parameter column by name.
    pub fn parameter_field<'a>(&self, name: &'a str) -> TuningResult<ParameterField<'a>> {
        if self.has_column(name) {
            Ok(ParameterField { name })
        } else {
            Err(TuningError::MissingField {
                field: name.to_string(),
            })
        }
    }
}

/// Number of distinct non-blank Alert IDs in a set.
pub fn distinct_alert_ids(alerts: &[&AlertRecord]) -> usize {
    alerts
        .iter()
        .filter_map(|a| a.alert_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}
