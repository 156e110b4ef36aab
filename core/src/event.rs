//! Pipeline events: the diagnostic trail of one run.
//!
//! RULE: stages report recoverable conditions as events, never as errors.
//! Only fatal conditions travel through `TuningError`.

use crate::types::{RunId, Variant};
use serde::{Deserialize, Serialize};

/// Every event emitted during a run.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    RunInitialized {
        run_id: RunId,
        variant: Variant,
        tracker_rows: usize,
        alert_rows: usize,
    },
    /// A tracker row names a parameter column the alert table lacks.
    ParameterFieldMissing {
        rule_id: String,
        population_group: String,
        field: String,
        stage: String,
    },
    GroupNetted {
        rule_id: String,
        population_group: String,
        conditions: usize,
        alert_count: u64,
        proposed_alert_count: u64,
    },
    RunCompleted {
        run_id: RunId,
        tracker_rows: usize,
        final_net_alerts: usize,
    },
}

impl PipelineEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            PipelineEvent::RunInitialized { .. } => "run_initialized",
            PipelineEvent::ParameterFieldMissing { .. } => "parameter_field_missing",
            PipelineEvent::GroupNetted { .. } => "group_netted",
            PipelineEvent::RunCompleted { .. } => "run_completed",
        }
    }

    /// Stage that emitted the event.
    pub fn stage(&self) -> &str {
        match self {
            PipelineEvent::RunInitialized { .. } | PipelineEvent::RunCompleted { .. } => "engine",
            PipelineEvent::ParameterFieldMissing { stage, .. } => stage,
            PipelineEvent::GroupNetted { .. } => "net_metrics",
        }
    }
}

/// A persisted event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub stage: String,
    pub event_type: String,
    pub payload: String,
}
