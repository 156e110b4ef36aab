//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! A run is persisted only after the engine has finished it, in one
//! transaction, so a failed run leaves nothing behind.

use crate::{engine::TuningReport, error::TuningResult, event::EventLogEntry};
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummaryRow {
    pub run_id: String,
    pub variant: String,
    pub version: String,
    pub started_at: String,
    pub tracker_rows: i64,
    pub final_net_alerts: i64,
}

pub struct TuningStore {
    conn: Connection,
}

impl TuningStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> TuningResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> TuningResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> TuningResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_tuning_run.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    /// Persist a finished run: header, output rows, and event log.
    pub fn save_report(&self, report: &TuningReport, version: &str) -> TuningResult<()> {
        let output = report.output();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO tuning_run
             (run_id, variant, version, started_at, tracker_rows, final_net_alerts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.run_id,
                report.variant.variant.as_str(),
                version,
                chrono::Utc::now().to_rfc3339(),
                report.tracker.len() as i64,
                report.final_net_alerts as i64,
            ],
        )?;

        for (index, row) in report.tracker.rows.iter().enumerate() {
            let payload = output
                .row_json(index)
                .map(|v| v.to_string())
                .unwrap_or_default();
            tx.execute(
                "INSERT INTO tracker_output
                 (run_id, row_index, rule_id, population_group, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    report.run_id,
                    index as i64,
                    row.rule_id,
                    row.population_group,
                    payload,
                ],
            )?;
        }

        for event in &report.events {
            tx.execute(
                "INSERT INTO event_log (run_id, stage, event_type, payload)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    report.run_id,
                    event.stage(),
                    event.type_name(),
                    serde_json::to_string(event)?,
                ],
            )?;
        }

        tx.commit()?;
        log::info!(
            "Saved run {} ({} rows, {} events)",
            report.run_id,
            report.tracker.len(),
            report.events.len()
        );
        Ok(())
    }

    pub fn run_summary(&self, run_id: &str) -> TuningResult<Option<RunSummaryRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT run_id, variant, version, started_at, tracker_rows, final_net_alerts
                 FROM tuning_run WHERE run_id = ?1",
                params![run_id],
                |row| {
                    Ok(RunSummaryRow {
                        run_id: row.get(0)?,
                        variant: row.get(1)?,
                        version: row.get(2)?,
                        started_at: row.get(3)?,
                        tracker_rows: row.get(4)?,
                        final_net_alerts: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn run_count(&self) -> TuningResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tuning_run", [], |row| row.get(0))?;
        Ok(count)
    }

    // ── Tracker output ─────────────────────────────────────────

    /// Output rows of a run, in tracker order, as JSON objects.
    pub fn tracker_output_for_run(&self, run_id: &str) -> TuningResult<Vec<serde_json::Value>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM tracker_output
             WHERE run_id = ?1 ORDER BY row_index ASC",
        )?;
        let payloads = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(Into::into))
            .collect()
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn events_for_run(&self, run_id: &str) -> TuningResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, stage, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    stage: row.get(2)?,
                    event_type: row.get(3)?,
                    payload: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
