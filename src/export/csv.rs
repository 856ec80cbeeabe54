//! CSV export

use crate::error::{Error, Result};
use crate::model::Table;

use super::Exporter;

/// Exporter producing comma separated text; nulls become empty fields
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .map_err(|e| Error::Serialization(e.to_string()))?;

        for row in &table.rows {
            writer
                .write_record(row.cells.iter().map(|c| c.text().into_owned()))
                .map_err(|e| Error::Serialization(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}
