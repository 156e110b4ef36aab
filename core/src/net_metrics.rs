//! Net metrics: the combined effect of every condition in a group.
//!
//! For each (rule, population group) group of tracker rows:
//!   1. start from the group's alerts
//!   2. narrow by each row's condition, in tracker order (sequential AND)
//!   3. count dispositions and distinct alert ids over what survives
//!   4. derive net ratios and broadcast them to every row of the group
//!
//! Must run after current_metrics.rs: the net Not Interesting reduction is
//! measured against the first row's baseline Not Interesting count.

use crate::{
    alert::{distinct_alert_ids, AlertRecord, AlertTable},
    config::{FormulaSet, VariantConfig},
    current_metrics::count_disposition,
    error::TuningResult,
    event::PipelineEvent,
    grouping::{group, tracker_groups, TrackerGroup},
    predicate::ThresholdCondition,
    ratio::safe_pct,
    tracker::TrackerTable,
    types::Disposition,
};

/// Narrow `initial` by each condition in order.
pub fn narrow<'a>(
    initial: Vec<&'a AlertRecord>,
    conditions: &[ThresholdCondition],
) -> Vec<&'a AlertRecord> {
    conditions
        .iter()
        .fold(initial, |working, condition| condition.filter(&working))
}

// ── Accumulator ──────────────────────────────────────────────────────────────

/// Every group's net alert set, concatenated across the run.
#[derive(Debug, Default)]
pub struct NetAlertAccumulator<'a> {
    alerts: Vec<&'a AlertRecord>,
}

impl<'a> NetAlertAccumulator<'a> {
    pub fn extend(&mut self, alerts: &[&'a AlertRecord]) {
        self.alerts.extend_from_slice(alerts);
    }

    /// Rows accumulated, duplicates included.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn distinct_alert_ids(&self) -> usize {
        distinct_alert_ids(&self.alerts)
    }
}

// ── Group summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NetSummary {
    pub alert_count: u64,
    pub proposed_alert_count: u64,
    pub sars_filed: u64,
    pub interesting: u64,
    pub not_interesting: u64,
    pub net_effectiveness: f64,
    /// ATL only.
    pub net_sar_yield: Option<f64>,
    /// ATL only.
    pub net_not_interesting_reduction: Option<f64>,
}

pub struct NetOutcome<'a> {
    pub accumulator: NetAlertAccumulator<'a>,
    pub events: Vec<PipelineEvent>,
}

pub struct NetMetricsCalculator<'a> {
    variant: &'a VariantConfig,
    alerts: &'a AlertTable,
}

impl<'a> NetMetricsCalculator<'a> {
    pub fn new(variant: &'a VariantConfig, alerts: &'a AlertTable) -> Self {
        Self { variant, alerts }
    }

    pub fn apply(&self, tracker: &mut TrackerTable) -> TuningResult<NetOutcome<'a>> {
        let mut accumulator = NetAlertAccumulator::default();
        let mut events = Vec::new();

        let groups = tracker_groups(&tracker.rows, self.variant.case_insensitive_rule);
        for g in &groups {
            let conditions = g
                .row_indices
                .iter()
                .map(|&i| tracker.rows[i].condition(self.variant))
                .collect::<TuningResult<Vec<_>>>()?;

            let missing: Vec<&ThresholdCondition> = conditions
                .iter()
                .filter(|c| !self.alerts.has_column(&c.field))
                .collect();
            if !missing.is_empty() {
                for c in missing {
                    log::warn!(
                        "Parameter field '{}' missing for rule {} / {}; net metrics skipped",
                        c.field,
                        g.rule_id,
                        g.population_group
                    );
                    events.push(PipelineEvent::ParameterFieldMissing {
                        rule_id: g.rule_id.clone(),
                        population_group: g.population_group.clone(),
                        field: c.field.clone(),
                        stage: "net_metrics".into(),
                    });
                }
                continue;
            }

            let baseline_not_interesting = tracker.rows[g.row_indices[0]]
                .metrics
                .not_interesting_alerts
                .unwrap_or(0);

            let (summary, net) = self.summarise(g, &conditions, baseline_not_interesting);

            for &i in &g.row_indices {
                let m = &mut tracker.rows[i].metrics;
                m.net_effectiveness = Some(summary.net_effectiveness);
                m.net_sar_yield = summary.net_sar_yield;
                m.net_not_interesting_alert_reduction = summary.net_not_interesting_reduction;
                m.alert_count = Some(summary.alert_count);
                m.proposed_alert_count = Some(summary.proposed_alert_count);
            }

            log::debug!(
                "{} / {}: {} conditions, {} -> {} alerts, net effectiveness {}",
                g.rule_id,
                g.population_group,
                conditions.len(),
                summary.alert_count,
                summary.proposed_alert_count,
                summary.net_effectiveness
            );

            events.push(PipelineEvent::GroupNetted {
                rule_id: g.rule_id.clone(),
                population_group: g.population_group.clone(),
                conditions: conditions.len(),
                alert_count: summary.alert_count,
                proposed_alert_count: summary.proposed_alert_count,
            });

            accumulator.extend(&net);
        }

        log::info!(
            "Net metrics computed for {} groups; {} distinct net alerts",
            groups.len(),
            accumulator.distinct_alert_ids()
        );

        Ok(NetOutcome {
            accumulator,
            events,
        })
    }

    /// Narrow one group's alerts and derive its net figures.
    pub fn summarise(
        &self,
        g: &TrackerGroup,
        conditions: &[ThresholdCondition],
        baseline_not_interesting: u64,
    ) -> (NetSummary, Vec<&'a AlertRecord>) {
        let grouped = group(
            self.alerts.alerts(),
            &g.rule_id,
            &g.population_group,
            self.variant.case_insensitive_rule,
        );
        let alert_count = distinct_alert_ids(&grouped) as u64;

        let net = narrow(grouped, conditions);

        let sars_filed = if self.variant.tracks_sar {
            count_disposition(&net, &Disposition::SarFiled)
        } else {
            0
        };
        let interesting = count_disposition(&net, &Disposition::Interesting);
        let not_interesting = count_disposition(&net, &Disposition::NotInteresting);
        let decisioned = (sars_filed + interesting + not_interesting) as f64;

        let net_effectiveness = safe_pct((interesting + sars_filed) as f64, decisioned);
        let net_sar_yield = self
            .variant
            .tracks_sar
            .then(|| safe_pct(sars_filed as f64, decisioned));
        let net_not_interesting_reduction = (self.variant.formulas == FormulaSet::Atl).then(|| {
            safe_pct(
                baseline_not_interesting as f64 - not_interesting as f64,
                baseline_not_interesting as f64,
            )
        });

        let summary = NetSummary {
            alert_count,
            proposed_alert_count: distinct_alert_ids(&net) as u64,
            sars_filed,
            interesting,
            not_interesting,
            net_effectiveness,
            net_sar_yield,
            net_not_interesting_reduction,
        };
        (summary, net)
    }
}
