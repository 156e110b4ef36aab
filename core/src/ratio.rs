//! Ratio aggregator: whole-table percentages with safe division.
//!
//! RULE: a zero denominator yields exactly 0. Never NaN, never infinity.
//! All percentages are rounded to two decimals.

use crate::{
    config::{FormulaSet, VariantConfig},
    tracker::{TrackerMetrics, TrackerTable},
};

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `100 * numerator / denominator`, rounded; 0 when the denominator is 0.
pub fn safe_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(100.0 * numerator / denominator)
    }
}

fn count(v: Option<u64>) -> f64 {
    v.unwrap_or(0) as f64
}

pub struct RatioAggregator;

impl RatioAggregator {
    /// Apply the variant's formula set to every row, then zero-fill.
    pub fn apply(tracker: &mut TrackerTable, variant: &VariantConfig) {
        for row in &mut tracker.rows {
            match variant.formulas {
                FormulaSet::Atl => Self::atl_row(&mut row.metrics),
                FormulaSet::Btl => Self::btl_row(&mut row.metrics),
            }
            row.metrics.fill_unset_with_zero();
        }
        log::info!(
            "Ratios computed for {} tracker rows ({:?} formulas)",
            tracker.len(),
            variant.formulas
        );
    }

    fn atl_row(m: &mut TrackerMetrics) {
        let extracted = count(m.num_alerts_extracted);
        let sars = count(m.sars_filed);
        let interesting = count(m.interesting_alerts);
        let not_interesting = count(m.not_interesting_alerts);

        let prop_sars = count(m.prop_sars_filed);
        let prop_interesting = count(m.prop_interesting_alerts);
        let prop_not_interesting = count(m.prop_not_interesting_alerts);
        let prop_decisioned = prop_sars + prop_interesting + prop_not_interesting;

        let alert_count = count(m.alert_count);
        let proposed_alert_count = count(m.proposed_alert_count);

        m.effectiveness = Some(safe_pct(interesting + sars, extracted));
        m.sar_yield = Some(safe_pct(sars, extracted));
        m.prop_effectiveness = Some(safe_pct(prop_interesting + prop_sars, prop_decisioned));
        m.prop_sar_yield = Some(safe_pct(prop_sars, prop_decisioned));
        m.not_interesting_alert_reduction = Some(safe_pct(
            not_interesting - prop_not_interesting,
            not_interesting,
        ));
        m.proposed_alert_reduction = Some(safe_pct(
            alert_count - proposed_alert_count,
            alert_count,
        ));
    }

    fn btl_row(m: &mut TrackerMetrics) {
        let interesting = count(m.interesting_alerts);
        let not_interesting = count(m.not_interesting_alerts);
        let prop_interesting = count(m.prop_interesting_alerts);
        let prop_not_interesting = count(m.prop_not_interesting_alerts);

        m.effectiveness = Some(safe_pct(interesting, interesting + not_interesting));
        m.prop_effectiveness = Some(safe_pct(
            prop_interesting,
            prop_interesting + prop_not_interesting,
        ));
    }
}
