//! Input loading: JSON record arrays into string-typed tables.
//!
//! Every cell is kept as text, the same way the upstream workbooks are read.
//! Numeric interpretation happens later, per column, in the predicate layer.

use crate::error::{TuningError, TuningResult};
use serde_json::Value;
use std::collections::HashMap;

/// One input row, keyed by column header.
pub type RawRow = HashMap<String, String>;

/// A string-typed table: column headers in first-seen order plus rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Load a table from a JSON file holding an array of objects.
    pub fn load(name: &str, path: &str) -> TuningResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let table = Self::from_json_str(name, &content)?;
        log::info!(
            "Loaded table '{}' from {}: {} rows, {} columns",
            name,
            path,
            table.rows.len(),
            table.columns.len()
        );
        Ok(table)
    }

    pub fn from_json_str(name: &str, json: &str) -> TuningResult<Self> {
        let records: Vec<serde_json::Map<String, Value>> = serde_json::from_str(json)?;
        let mut table = RawTable::new(name);
        for record in records {
            let mut row = RawRow::with_capacity(record.len());
            for (column, value) in record {
                if !table.columns.iter().any(|c| c == &column) {
                    table.columns.push(column.clone());
                }
                row.insert(column, cell_text(&value));
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Append a row, registering any new column headers.
    pub fn push_row<K, V>(&mut self, cells: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = RawRow::new();
        for (column, value) in cells {
            let column = column.into();
            if !self.columns.iter().any(|c| c == &column) {
                self.columns.push(column.clone());
            }
            row.insert(column, value.into());
        }
        self.rows.push(row);
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with `MissingColumn` on the first required header that is absent.
    ///
    /// Headers come from the rows, so a table with no rows has none to check
    /// and always passes.
    pub fn require_columns(&self, required: &[&str]) -> TuningResult<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        match required.iter().find(|c| !self.has_column(c)) {
            Some(column) => Err(TuningError::MissingColumn {
                table: self.name.clone(),
                column: (*column).to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Render a JSON scalar the way a string-typed spreadsheet read would.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Fetch a cell as text, blank when the row lacks the column.
pub fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}
