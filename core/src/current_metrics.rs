//! Current metrics: per tracker row, against the unfiltered baseline.
//!
//! Each row is evaluated on its own:
//!   - baseline disposition counts for the row's (rule, population group)
//!   - min / max of the row's parameter column
//!   - "proposed" counts: what the row's threshold alone would keep
//!
//! Rows sharing a group are NOT combined here; see net_metrics.rs.

use crate::{
    alert::{AlertRecord, AlertTable},
    config::VariantConfig,
    error::{TuningError, TuningResult},
    event::PipelineEvent,
    grouping::group,
    predicate::{self, Operator},
    tracker::{TrackerRow, TrackerTable},
    types::{Disposition, Variant},
};

pub(crate) fn count_disposition(alerts: &[&AlertRecord], disposition: &Disposition) -> u64 {
    alerts
        .iter()
        .filter(|a| &a.tuning_decision == disposition)
        .count() as u64
}

/// Min and max over coercible values; `None` when nothing coerces.
pub fn value_range(alerts: &[&AlertRecord], field: &str) -> Option<(f64, f64)> {
    alerts
        .iter()
        .filter_map(|a| a.numeric(field))
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub struct CurrentMetricsCalculator<'a> {
    variant: &'a VariantConfig,
    alerts: &'a AlertTable,
    /// BTL only: the extracted (pre-sampling) population.
    extracted: Option<&'a AlertTable>,
}

impl<'a> CurrentMetricsCalculator<'a> {
    pub fn new(
        variant: &'a VariantConfig,
        alerts: &'a AlertTable,
        extracted: Option<&'a AlertTable>,
    ) -> Self {
        Self {
            variant,
            alerts,
            extracted,
        }
    }

    pub fn apply(&self, tracker: &mut TrackerTable) -> TuningResult<Vec<PipelineEvent>> {
        let mut events = Vec::new();
        for row in &mut tracker.rows {
            events.extend(self.apply_row(row)?);
        }
        log::info!(
            "Current metrics computed for {} tracker rows ({} field notices)",
            tracker.rows.len(),
            events.len()
        );
        Ok(events)
    }

    /// Populate baseline and proposed fields on one row.
    ///
    /// Returns a notice when the row's parameter column is missing; the
    /// row's min/max and proposed counts are then left unset.
    pub fn apply_row(&self, row: &mut TrackerRow) -> TuningResult<Option<PipelineEvent>> {
        // Operator errors are fatal even when the field is missing.
        let _: Operator = row.operator.parse()?;

        let ci = self.variant.case_insensitive_rule;
        let grouped = group(self.alerts.alerts(), &row.rule_id, &row.population_group, ci);
        let total = grouped.len() as u64;

        match self.variant.variant {
            Variant::Atl => {
                row.metrics.num_alerts_extracted = Some(total);
            }
            Variant::Btl => {
                row.metrics.num_alerts_sampled = Some(total);
                if let Some(extracted) = self.extracted {
                    let extracted_group =
                        group(extracted.alerts(), &row.rule_id, &row.population_group, ci);
                    row.metrics.num_alerts_extracted = Some(extracted_group.len() as u64);
                }
            }
        }

        if self.variant.tracks_sar {
            row.metrics.sars_filed = Some(count_disposition(&grouped, &Disposition::SarFiled));
        }
        row.metrics.interesting_alerts =
            Some(count_disposition(&grouped, &Disposition::Interesting));
        row.metrics.not_interesting_alerts =
            Some(count_disposition(&grouped, &Disposition::NotInteresting));
        row.metrics.data_quality_alerts =
            Some(count_disposition(&grouped, &Disposition::DataQuality));

        let field_name = row.parameter_field(self.variant).to_string();
        let field = match self.alerts.parameter_field(&field_name) {
            Ok(field) => field,
            Err(TuningError::MissingField { field }) => {
                log::warn!(
                    "Parameter field '{}' missing for rule {} / {}; proposed metrics skipped",
                    field,
                    row.rule_id,
                    row.population_group
                );
                return Ok(Some(PipelineEvent::ParameterFieldMissing {
                    rule_id: row.rule_id.clone(),
                    population_group: row.population_group.clone(),
                    field,
                    stage: "current_metrics".into(),
                }));
            }
            Err(e) => return Err(e),
        };

        if let Some((lo, hi)) = value_range(&grouped, field.name()) {
            row.metrics.min_val = Some(lo);
            row.metrics.max_val = Some(hi);
        }

        let proposed = predicate::evaluate(&grouped, field, &row.operator, row.threshold)?;
        if self.variant.tracks_sar {
            row.metrics.prop_sars_filed =
                Some(count_disposition(&proposed, &Disposition::SarFiled));
        }
        row.metrics.prop_interesting_alerts =
            Some(count_disposition(&proposed, &Disposition::Interesting));
        row.metrics.prop_not_interesting_alerts =
            Some(count_disposition(&proposed, &Disposition::NotInteresting));

        log::debug!(
            "{} / {}: {} alerts, {} pass {} {} {}",
            row.rule_id,
            row.population_group,
            total,
            proposed.len(),
            field.name(),
            row.operator.trim(),
            row.threshold
        );

        Ok(None)
    }
}
