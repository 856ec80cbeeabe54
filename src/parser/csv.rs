//! CSV/TSV loader

use std::borrow::Cow;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{CellValue, Table};

use super::{header_columns, header_out_of_range, LoadOptions, Loader};

/// Loader for delimited text files.
///
/// CSV carries no type information, so every non-blank cell is kept as text.
pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    /// Comma separated values
    pub fn comma() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab separated values
    pub fn tab() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl Loader for CsvLoader {
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut records = Vec::new();
        for (line_num, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::Parse(format!("Failed to read CSV row {}: {}", line_num + 1, e))
            })?;
            records.push(record);
        }

        let header_row = options.header_row;
        if header_row >= records.len() {
            return Err(header_out_of_range(header_row, records.len()));
        }

        let raw_names: Vec<String> = records[header_row].iter().map(str::to_string).collect();
        let columns = header_columns(&raw_names, 0);
        if columns.is_empty() {
            return Err(Error::Parse(format!("Header row {} is empty", header_row + 1)));
        }

        let mut table = Table::new(columns);
        for (offset, record) in records.iter().enumerate().skip(header_row + 1) {
            let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            table.add_row(cells, offset + 1);
        }

        table.infer_column_types();
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded delimited file"
        );

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        match self.delimiter {
            b'\t' => matches!(ext.to_lowercase().as_str(), "tsv" | "tab"),
            _ => matches!(ext.to_lowercase().as_str(), "csv" | "txt"),
        }
    }
}

/// Blank cells are null; everything else stays text
fn parse_cell_value(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}
