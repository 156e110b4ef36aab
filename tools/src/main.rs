//! tuning-runner: headless tuning tracker calculator.
//!
//! Usage:
//!   tuning-runner --variant atl --tracker atl_tracker.json --alerts deduped.json --out atl_out.json
//!   tuning-runner --variant btl --tracker btl_tracker.json --alerts sampled.json \
//!                 --extracted delta.json --db runs.db

use anyhow::{Context, Result};
use std::env;
use tuning_core::{
    alert::AlertTable,
    config::{ParameterSource, TuningConfig},
    engine::{TuningEngine, TuningReport},
    event::PipelineEvent,
    loader::RawTable,
    store::TuningStore,
    tracker::TrackerTable,
    types::Variant,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let requested: Option<Variant> = arg_value(&args, "--variant")
        .map(|v| v.parse::<Variant>().map_err(anyhow::Error::msg))
        .transpose()?;
    let tracker_path = arg_value(&args, "--tracker").context("--tracker FILE is required")?;
    let alerts_path = arg_value(&args, "--alerts").context("--alerts FILE is required")?;
    let extracted_path = arg_value(&args, "--extracted");
    let out_path = arg_value(&args, "--out");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => {
            let config = TuningConfig::load(path)?;
            if let Some(variant) = requested {
                config.ensure_variant(variant)?;
            }
            config
        }
        None => TuningConfig::default_for(requested.unwrap_or(Variant::Atl)),
    };
    if let Some(field) = arg_value(&args, "--fixed-parameter") {
        config.variant.parameter_source = ParameterSource::fixed(field);
    }

    println!("Alert Tuning Tracker: tuning-runner");
    println!("  variant:    {}", config.variant.variant);
    println!("  tracker:    {tracker_path}");
    println!("  alerts:     {alerts_path}");
    if let Some(path) = extracted_path {
        println!("  extracted:  {path}");
    }
    println!("  parameter:  {:?}", config.variant.parameter_source);
    println!("  db:         {db}");
    println!();

    let tracker = TrackerTable::from_raw(&RawTable::load("tracker", tracker_path)?)?;
    let alerts = AlertTable::from_raw(&RawTable::load("alerts", alerts_path)?)?;
    let extracted = extracted_path
        .map(|path| -> Result<AlertTable> {
            Ok(AlertTable::from_extracted_raw(&RawTable::load("extracted", path)?)?)
        })
        .transpose()?;

    let engine = TuningEngine::with_generated_id(config);
    let report = engine.run(tracker, &alerts, extracted.as_ref())?;

    let store = TuningStore::open(db)?;
    store.migrate()?;
    persist_and_write(&report, &store, out_path)?;

    print_summary(&report);
    Ok(())
}

/// Save the run, then write the output file. A failed save leaves no file.
fn persist_and_write(
    report: &TuningReport,
    store: &TuningStore,
    out_path: Option<&str>,
) -> Result<()> {
    store.save_report(report, env!("CARGO_PKG_VERSION"))?;
    if let Some(path) = out_path {
        let json = serde_json::to_string_pretty(&report.output())?;
        std::fs::write(path, json).with_context(|| format!("Cannot write {path}"))?;
    }
    Ok(())
}

fn print_summary(report: &TuningReport) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:        {}", report.run_id);
    println!("  tracker rows:  {}", report.tracker.len());
    println!("  events:        {}", report.events.len());

    let missing = report
        .events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::ParameterFieldMissing { .. }))
        .count();
    if missing > 0 {
        println!("  field notices: {missing} (see log)");
    }

    println!();
    println!("=== NET EFFECTIVENESS BY GROUP ===");
    let mut last_key: Option<(&str, &str)> = None;
    for row in &report.tracker.rows {
        let key = (row.rule_id.as_str(), row.population_group.as_str());
        if last_key == Some(key) {
            continue;
        }
        last_key = Some(key);
        println!(
            "  {} | {} | Net Eff: {:.2}% | Alerts: {} -> {}",
            row.rule_id,
            row.population_group,
            row.metrics.net_effectiveness.unwrap_or(0.0),
            row.metrics.alert_count.unwrap_or(0),
            row.metrics.proposed_alert_count.unwrap_or(0),
        );
    }

    println!();
    println!("Distinct net alert IDs: {}", report.final_net_alerts);
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
