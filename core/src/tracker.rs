//! The tuning tracker: one row per tunable rule / population group / condition.
//!
//! Rows are read once, filtered to tunable rows, sorted, and then annotated
//! in place by the pipeline stages. Result fields start unset (`None`) and
//! are normalised to zero only at the very end of a run.

use crate::{
    columns,
    config::VariantConfig,
    error::{TuningError, TuningResult},
    loader::{cell, RawRow, RawTable},
    predicate::{Operator, ThresholdCondition},
};
use serde::Serialize;

// ── Result fields ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerMetrics {
    pub date_range: Option<String>,

    pub num_alerts_extracted: Option<u64>,
    pub num_alerts_sampled: Option<u64>,
    pub sars_filed: Option<u64>,
    pub interesting_alerts: Option<u64>,
    pub not_interesting_alerts: Option<u64>,
    pub data_quality_alerts: Option<u64>,

    pub prop_sars_filed: Option<u64>,
    pub prop_interesting_alerts: Option<u64>,
    pub prop_not_interesting_alerts: Option<u64>,

    pub min_val: Option<f64>,
    pub max_val: Option<f64>,

    pub alert_count: Option<u64>,
    pub proposed_alert_count: Option<u64>,

    pub effectiveness: Option<f64>,
    pub sar_yield: Option<f64>,
    pub prop_effectiveness: Option<f64>,
    pub prop_sar_yield: Option<f64>,
    pub not_interesting_alert_reduction: Option<f64>,
    pub proposed_alert_reduction: Option<f64>,

    pub net_effectiveness: Option<f64>,
    pub net_sar_yield: Option<f64>,
    pub net_not_interesting_alert_reduction: Option<f64>,
}

impl TrackerMetrics {
    /// Replace every unset numeric field with zero.
    pub fn fill_unset_with_zero(&mut self) {
        for count in [
            &mut self.num_alerts_extracted,
            &mut self.num_alerts_sampled,
            &mut self.sars_filed,
            &mut self.interesting_alerts,
            &mut self.not_interesting_alerts,
            &mut self.data_quality_alerts,
            &mut self.prop_sars_filed,
            &mut self.prop_interesting_alerts,
            &mut self.prop_not_interesting_alerts,
            &mut self.alert_count,
            &mut self.proposed_alert_count,
        ] {
            count.get_or_insert(0);
        }
        for value in [
            &mut self.min_val,
            &mut self.max_val,
            &mut self.effectiveness,
            &mut self.sar_yield,
            &mut self.prop_effectiveness,
            &mut self.prop_sar_yield,
            &mut self.not_interesting_alert_reduction,
            &mut self.proposed_alert_reduction,
            &mut self.net_effectiveness,
            &mut self.net_sar_yield,
            &mut self.net_not_interesting_alert_reduction,
        ] {
            value.get_or_insert(0.0);
        }
    }

    /// Text rendering of a result column; `None` for unknown columns.
    pub fn column_value(&self, column: &str) -> Option<CellValue> {
        let count = |v: Option<u64>| CellValue::from_count(v);
        let ratio = |v: Option<f64>| CellValue::from_ratio(v);
        let value = match column {
            columns::DATE_RANGE => CellValue::Text(self.date_range.clone().unwrap_or_default()),
            columns::NUM_ALERTS_EXTRACTED => count(self.num_alerts_extracted),
            columns::NUM_ALERTS_SAMPLED => count(self.num_alerts_sampled),
            columns::SARS_FILED => count(self.sars_filed),
            columns::INTERESTING_ALERTS => count(self.interesting_alerts),
            columns::NOT_INTERESTING_ALERTS => count(self.not_interesting_alerts),
            columns::DATA_QUALITY_ALERTS => count(self.data_quality_alerts),
            columns::PROP_SARS_FILED => count(self.prop_sars_filed),
            columns::PROP_INTERESTING_ALERTS => count(self.prop_interesting_alerts),
            columns::PROP_NOT_INTERESTING_ALERTS => count(self.prop_not_interesting_alerts),
            columns::MIN_VAL => ratio(self.min_val),
            columns::MAX_VAL => ratio(self.max_val),
            columns::ALERT_COUNT => count(self.alert_count),
            columns::PROPOSED_ALERT_COUNT => count(self.proposed_alert_count),
            columns::EFFECTIVENESS => ratio(self.effectiveness),
            columns::SAR_YIELD => ratio(self.sar_yield),
            columns::PROP_EFFECTIVENESS => ratio(self.prop_effectiveness),
            columns::PROP_SAR_YIELD => ratio(self.prop_sar_yield),
            columns::NOT_INTERESTING_ALERT_REDUCTION => ratio(self.not_interesting_alert_reduction),
            columns::PROPOSED_ALERT_REDUCTION => ratio(self.proposed_alert_reduction),
            columns::NET_EFFECTIVENESS => ratio(self.net_effectiveness),
            columns::NET_SAR_YIELD => ratio(self.net_sar_yield),
            columns::NET_NOT_INTERESTING_ALERT_REDUCTION => {
                ratio(self.net_not_interesting_alert_reduction)
            }
            _ => return None,
        };
        Some(value)
    }
}

/// One output cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    fn from_count(v: Option<u64>) -> Self {
        v.map(|n| CellValue::Number(n as f64)).unwrap_or(CellValue::Empty)
    }

    fn from_ratio(v: Option<f64>) -> Self {
        v.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

// ── Tracker row ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TrackerRow {
    pub rule_id: String,
    pub population_group: String,
    /// Raw "Parameter Type" text; may be overridden by a fixed field.
    pub parameter_type: String,
    /// Raw "Operator" text, parsed when the row's condition is built.
    pub operator: String,
    pub threshold: f64,
    pub is_tunable: String,
    /// All input columns, untouched.
    pub passthrough: RawRow,
    pub metrics: TrackerMetrics,
}

impl TrackerRow {
    pub fn new(
        rule_id: &str,
        population_group: &str,
        parameter_type: &str,
        operator: &str,
        threshold: f64,
    ) -> Self {
        let passthrough: RawRow = [
            (columns::RULE_ID, rule_id.to_string()),
            (columns::POPULATION_GROUP, population_group.to_string()),
            (columns::PARAMETER_TYPE, parameter_type.to_string()),
            (columns::OPERATOR, operator.to_string()),
            (columns::RECOMMENDED_THRESHOLD, threshold.to_string()),
            (columns::IS_TUNABLE, columns::TUNABLE_YES.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            rule_id: rule_id.to_string(),
            population_group: population_group.to_string(),
            parameter_type: parameter_type.to_string(),
            operator: operator.to_string(),
            threshold,
            is_tunable: columns::TUNABLE_YES.to_string(),
            passthrough,
            metrics: TrackerMetrics::default(),
        }
    }

    fn from_raw(row: &RawRow) -> TuningResult<Self> {
        let rule_id = cell(row, columns::RULE_ID).to_string();
        let population_group = cell(row, columns::POPULATION_GROUP).to_string();
        let raw_threshold = cell(row, columns::RECOMMENDED_THRESHOLD);
        let threshold = raw_threshold
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| !t.is_nan())
            .ok_or_else(|| TuningError::InvalidThreshold {
                rule_id: rule_id.clone(),
                population_group: population_group.clone(),
                value: raw_threshold.to_string(),
            })?;

        Ok(Self {
            rule_id,
            population_group,
            parameter_type: cell(row, columns::PARAMETER_TYPE).to_string(),
            operator: cell(row, columns::OPERATOR).to_string(),
            threshold,
            is_tunable: cell(row, columns::IS_TUNABLE).to_string(),
            passthrough: row.clone(),
            metrics: TrackerMetrics::default(),
        })
    }

    /// Name of the alert column this row's threshold applies to.
    pub fn parameter_field<'a>(&'a self, variant: &'a VariantConfig) -> &'a str {
        variant.parameter_source.field_for(&self.parameter_type)
    }

    /// Parse this row's condition. Fails on an unknown operator.
    pub fn condition(&self, variant: &VariantConfig) -> TuningResult<ThresholdCondition> {
        let operator: Operator = self.operator.parse()?;
        Ok(ThresholdCondition::new(
            self.parameter_field(variant),
            operator,
            self.threshold,
        ))
    }
}

// ── Tracker table ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TrackerTable {
    /// Input headers in input order; result columns are appended on output.
    pub input_columns: Vec<String>,
    pub rows: Vec<TrackerRow>,
}

impl TrackerTable {
    pub fn new(rows: Vec<TrackerRow>) -> Self {
        Self {
            input_columns: [
                columns::RULE_ID,
                columns::POPULATION_GROUP,
                columns::PARAMETER_TYPE,
                columns::OPERATOR,
                columns::RECOMMENDED_THRESHOLD,
                columns::IS_TUNABLE,
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            rows,
        }
    }

    /// Keep tunable rows only, stable-sorted by Rule ID then Population Group.
    ///
    /// Non-tunable rows are dropped before thresholds are parsed, so their
    /// threshold cells may hold anything.
    pub fn from_raw(raw: &RawTable) -> TuningResult<Self> {
        raw.require_columns(&[
            columns::RULE_ID,
            columns::POPULATION_GROUP,
            columns::OPERATOR,
            columns::RECOMMENDED_THRESHOLD,
            columns::IS_TUNABLE,
        ])?;

        let mut rows = raw
            .rows
            .iter()
            .filter(|row| cell(row, columns::IS_TUNABLE) == columns::TUNABLE_YES)
            .map(TrackerRow::from_raw)
            .collect::<TuningResult<Vec<_>>>()?;

        rows.sort_by(|a, b| {
            a.rule_id
                .cmp(&b.rule_id)
                .then_with(|| a.population_group.cmp(&b.population_group))
        });

        log::info!(
            "Tracker '{}': {} of {} rows tunable",
            raw.name,
            rows.len(),
            raw.rows.len()
        );

        Ok(Self {
            input_columns: raw.columns.clone(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output header: input columns, then the variant's result columns.
    pub fn output_columns(&self, variant: &VariantConfig) -> Vec<String> {
        let mut header = self.input_columns.clone();
        for column in variant.result_columns() {
            if !header.iter().any(|c| c == column) {
                header.push(column.to_string());
            }
        }
        header
    }

    /// Render the annotated tracker as a header plus rows of cells.
    pub fn to_output(&self, variant: &VariantConfig) -> OutputTable {
        let columns = self.output_columns(variant);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| {
                        let is_result = variant.result_columns().contains(&column.as_str());
                        if is_result {
                            row.metrics.column_value(column).unwrap_or(CellValue::Empty)
                        } else {
                            CellValue::Text(cell(&row.passthrough, column).to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        OutputTable { columns, rows }
    }
}

/// The enriched tracker, ready for an external writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl OutputTable {
    /// One row as a JSON object keyed by header.
    pub fn row_json(&self, index: usize) -> Option<serde_json::Value> {
        let row = self.rows.get(index)?;
        let map = self
            .columns
            .iter()
            .zip(row)
            .map(|(k, v)| {
                let value = match v {
                    CellValue::Text(s) => serde_json::Value::from(s.as_str()),
                    CellValue::Number(n) => serde_json::Value::from(*n),
                    CellValue::Empty => serde_json::Value::Null,
                };
                (k.clone(), value)
            })
            .collect::<serde_json::Map<_, _>>();
        Some(serde_json::Value::Object(map))
    }

    /// Value of `column` in row `index`.
    pub fn cell(&self, index: usize, column: &str) -> Option<&CellValue> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows.get(index)?.get(position)
    }
}
