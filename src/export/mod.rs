//! Serialization of result tables into downloadable documents

mod csv;
mod xlsx;

use std::path::Path;

use crate::error::Result;
use crate::join::JoinKind;
use crate::model::Table;

pub use self::csv::CsvExporter;
pub use self::xlsx::{XlsxExporter, SHEET_NAME};

/// Trait for table exporters
pub trait Exporter {
    /// Serialize a table into document bytes
    fn export(&self, table: &Table) -> Result<Vec<u8>>;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// MIME type of the produced document
    fn mime_type(&self) -> &'static str;

    /// Download name for a join result, e.g. `inner_joined_data.xlsx`
    fn file_name(&self, kind: JoinKind) -> String {
        format!("{}_joined_data.{}", kind, self.extension())
    }
}

/// Export a table as a single-sheet xlsx workbook
pub fn export(table: &Table) -> Result<Vec<u8>> {
    XlsxExporter::new().export(table)
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Pick an exporter from the output path extension; xlsx unless `.csv`
    pub fn for_path(path: &Path) -> Box<dyn Exporter> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Box::new(CsvExporter),
            _ => Box::new(XlsxExporter::new()),
        }
    }
}
