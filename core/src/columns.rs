//! Column names shared by the tracker and alert tables.
//!
//! RULE: column names are spelled exactly as the upstream workbooks spell them.
//! Nothing outside this module hardcodes a column header.

// ── Key columns ──────────────────────────────────────────────────────────────

pub const RULE_ID: &str = "Rule ID";
pub const POPULATION_GROUP: &str = "Population Group";

// ── Tracker input columns ────────────────────────────────────────────────────

pub const PARAMETER_TYPE: &str = "Parameter Type";
pub const OPERATOR: &str = "Operator";
pub const RECOMMENDED_THRESHOLD: &str = "Recommended Threshold";
pub const IS_TUNABLE: &str = "Is Tunable";

pub const TUNABLE_YES: &str = "Yes";

// ── Alert columns ────────────────────────────────────────────────────────────

pub const ALERT_ID: &str = "Alert ID";
pub const ALERT_DATE: &str = "Alert Date";
pub const TUNING_DECISION: &str = "Tuning Decision";

/// Parameter column used when the tracker's "Parameter Type" is ignored.
pub const DEFAULT_FIXED_PARAMETER: &str = "Occurrence_Parameter";

// ── Result columns ───────────────────────────────────────────────────────────

pub const DATE_RANGE: &str = "Date Range";
pub const NUM_ALERTS_EXTRACTED: &str = "Num Alerts Extracted";
pub const NUM_ALERTS_SAMPLED: &str = "Num Alerts Sampled";
pub const SARS_FILED: &str = "SARs Filed";
pub const INTERESTING_ALERTS: &str = "Interesting Alerts";
pub const NOT_INTERESTING_ALERTS: &str = "Not Interesting Alerts";
pub const DATA_QUALITY_ALERTS: &str = "Data Quality Alerts";
pub const EFFECTIVENESS: &str = "Effectiveness";
pub const SAR_YIELD: &str = "SAR Yield";
pub const PROP_SARS_FILED: &str = "Prop SARs Filed";
pub const PROP_INTERESTING_ALERTS: &str = "Prop Interesting Alerts";
pub const PROP_NOT_INTERESTING_ALERTS: &str = "Prop Not Interesting Alerts";
pub const PROP_EFFECTIVENESS: &str = "Prop Effectiveness";
pub const PROP_SAR_YIELD: &str = "Prop SAR Yield";
pub const NOT_INTERESTING_ALERT_REDUCTION: &str = "Not Interesting Alert Reduction";
pub const NET_EFFECTIVENESS: &str = "Net Effectiveness";
pub const NET_SAR_YIELD: &str = "Net SAR Yield";
pub const NET_NOT_INTERESTING_ALERT_REDUCTION: &str = "Net Not Interesting Alert Reduction";
pub const MIN_VAL: &str = "Min Val";
pub const MAX_VAL: &str = "Max Val";
pub const ALERT_COUNT: &str = "Alert Count";
pub const PROPOSED_ALERT_COUNT: &str = "Proposed Alert Count";
pub const PROPOSED_ALERT_REDUCTION: &str = "Proposed Alert Reduction";

/// Result columns appended to an ATL tracker, in output order.
pub const ATL_RESULT_COLUMNS: &[&str] = &[
    NUM_ALERTS_EXTRACTED,
    SARS_FILED,
    INTERESTING_ALERTS,
    NOT_INTERESTING_ALERTS,
    DATA_QUALITY_ALERTS,
    EFFECTIVENESS,
    SAR_YIELD,
    PROP_SARS_FILED,
    PROP_INTERESTING_ALERTS,
    PROP_NOT_INTERESTING_ALERTS,
    PROP_EFFECTIVENESS,
    PROP_SAR_YIELD,
    NOT_INTERESTING_ALERT_REDUCTION,
    NET_EFFECTIVENESS,
    NET_SAR_YIELD,
    NET_NOT_INTERESTING_ALERT_REDUCTION,
    MIN_VAL,
    MAX_VAL,
    ALERT_COUNT,
    PROPOSED_ALERT_COUNT,
    PROPOSED_ALERT_REDUCTION,
];

/// Result columns appended to a BTL tracker, in output order.
pub const BTL_RESULT_COLUMNS: &[&str] = &[
    NUM_ALERTS_EXTRACTED,
    NUM_ALERTS_SAMPLED,
    INTERESTING_ALERTS,
    NOT_INTERESTING_ALERTS,
    DATA_QUALITY_ALERTS,
    EFFECTIVENESS,
    PROP_INTERESTING_ALERTS,
    PROP_NOT_INTERESTING_ALERTS,
    PROP_EFFECTIVENESS,
    NET_EFFECTIVENESS,
    MIN_VAL,
    MAX_VAL,
];
