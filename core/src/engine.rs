//! The tuning engine: one batch run over a tracker and an alert population.
//!
//! EXECUTION ORDER (fixed):
//!   1. Date range summary    (when the variant enables it)
//!   2. Current metrics       (per row, against the baseline)
//!   3. Net metrics           (per group, all conditions jointly)
//!   4. Ratio aggregation     (whole table, then unset -> 0)
//!
//! RULES:
//!   - Net metrics read the Not Interesting baselines written by step 2.
//!   - The alert tables are never mutated.
//!   - A fatal error aborts the run; no partial report is produced.

use crate::{
    alert::AlertTable,
    config::{TuningConfig, VariantConfig},
    current_metrics::CurrentMetricsCalculator,
    date_range::date_range_label,
    error::TuningResult,
    event::PipelineEvent,
    net_metrics::NetMetricsCalculator,
    ratio::RatioAggregator,
    tracker::{OutputTable, TrackerTable},
    types::RunId,
};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct TuningReport {
    pub run_id: RunId,
    pub variant: VariantConfig,
    pub tracker: TrackerTable,
    /// Distinct Alert IDs across every group's net alert set.
    pub final_net_alerts: usize,
    pub events: Vec<PipelineEvent>,
}

impl TuningReport {
    pub fn output(&self) -> OutputTable {
        self.tracker.to_output(&self.variant)
    }
}

pub struct TuningEngine {
    pub run_id: RunId,
    config: TuningConfig,
}

impl TuningEngine {
    pub fn new(run_id: RunId, config: TuningConfig) -> Self {
        Self { run_id, config }
    }

    /// Engine with a fresh random run id.
    pub fn with_generated_id(config: TuningConfig) -> Self {
        let run_id = format!("run-{}-{}", config.variant.variant, uuid::Uuid::new_v4());
        Self::new(run_id, config)
    }

    pub fn variant(&self) -> &VariantConfig {
        &self.config.variant
    }

    /// Run every stage in order over `tracker`.
    ///
    /// `extracted` is the BTL pre-sampling population; ATL runs ignore it.
    pub fn run(
        &self,
        mut tracker: TrackerTable,
        alerts: &AlertTable,
        extracted: Option<&AlertTable>,
    ) -> TuningResult<TuningReport> {
        let variant = &self.config.variant;
        let mut events = vec![PipelineEvent::RunInitialized {
            run_id: self.run_id.clone(),
            variant: variant.variant,
            tracker_rows: tracker.len(),
            alert_rows: alerts.len(),
        }];
        log::info!(
            "run={} variant={} tracker_rows={} alerts={}",
            self.run_id,
            variant.variant,
            tracker.len(),
            alerts.len()
        );

        // 1. Date range
        if variant.date_range {
            let label = date_range_label(alerts);
            for row in &mut tracker.rows {
                row.metrics.date_range = label.clone();
            }
        }

        // 2. Current metrics
        let current = CurrentMetricsCalculator::new(variant, alerts, extracted);
        events.extend(current.apply(&mut tracker)?);

        // 3. Net metrics
        let net = NetMetricsCalculator::new(variant, alerts).apply(&mut tracker)?;
        events.extend(net.events);
        let final_net_alerts = net.accumulator.distinct_alert_ids();

        // 4. Ratios and normalisation
        RatioAggregator::apply(&mut tracker, variant);

        events.push(PipelineEvent::RunCompleted {
            run_id: self.run_id.clone(),
            tracker_rows: tracker.len(),
            final_net_alerts,
        });
        log::info!(
            "run={} complete: {} tracker rows, {} distinct net alerts",
            self.run_id,
            tracker.len(),
            final_net_alerts
        );

        Ok(TuningReport {
            run_id: self.run_id.clone(),
            variant: variant.clone(),
            tracker,
            final_net_alerts,
            events,
        })
    }
}
