//! JSON output format

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;
use termcolor::WriteColor;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{CellValue, Column, Row, Table};
use crate::pipeline::{JoinOutcome, JoinReport};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write<T: Serialize>(&self, value: &T, writer: &mut dyn WriteColor) -> Result<()> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)
        } else {
            serde_json::to_writer(&mut *writer, value)
        };
        result.map_err(|e| Error::Serialization(e.to_string()))?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonJoinOutput<'a> {
    report: &'a JoinReport,
    preview: Vec<IndexMap<&'a str, serde_json::Value>>,
}

#[derive(Serialize)]
struct JsonColumnsOutput<'a> {
    left_file: String,
    left_columns: &'a [Column],
    right_file: String,
    right_columns: &'a [Column],
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
    }
}

fn row_to_json<'a>(table: &'a Table, row: &Row) -> IndexMap<&'a str, serde_json::Value> {
    table
        .columns
        .iter()
        .zip(&row.cells)
        .map(|(column, cell)| (column.name.as_str(), cell_value_to_json(cell)))
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        outcome: &JoinOutcome,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let preview = outcome
            .merged
            .head(config.preview_rows)
            .iter()
            .map(|row| row_to_json(&outcome.merged, row))
            .collect();

        let output = JsonJoinOutput {
            report: &outcome.report,
            preview,
        };
        self.write(&output, writer)
    }

    fn render_columns(
        &self,
        left: &Table,
        right: &Table,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let output = JsonColumnsOutput {
            left_file: config.left_file.display().to_string(),
            left_columns: &left.columns,
            right_file: config.right_file.display().to_string(),
            right_columns: &right.columns,
        };
        self.write(&output, writer)
    }
}
