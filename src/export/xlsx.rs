//! Excel workbook export

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{CellValue, Table};

use super::Exporter;

/// Name of the single worksheet in exported workbooks
pub const SHEET_NAME: &str = "MergedData";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;
const MAX_STRING_LEN: usize = 32_767;

/// Largest integer an Excel number holds exactly
const MAX_EXACT_INT: u64 = 1 << 53;

/// Exporter producing a single-sheet xlsx workbook
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
        }
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

struct CellFormats {
    date: Format,
    datetime: Format,
}

impl Exporter for XlsxExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>> {
        if table.row_count() + 1 > MAX_ROWS {
            return Err(Error::Serialization(format!(
                "{} rows exceed the worksheet limit of {}",
                table.row_count(),
                MAX_ROWS - 1
            )));
        }
        if table.column_count() > MAX_COLUMNS {
            return Err(Error::Serialization(format!(
                "{} columns exceed the worksheet limit of {}",
                table.column_count(),
                MAX_COLUMNS
            )));
        }

        let formats = CellFormats {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        };

        let mut workbook = Workbook::new();
        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&self.sheet_name)?;

            for (col, column) in table.columns.iter().enumerate() {
                write_text(worksheet, 0, col as u16, &column.name)?;
            }

            for (row_idx, row) in table.rows.iter().enumerate() {
                let excel_row = (row_idx + 1) as u32;
                for (col, cell) in row.cells.iter().enumerate() {
                    write_cell(worksheet, excel_row, col as u16, cell, &formats)?;
                }
            }
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            bytes = bytes.len(),
            "exported workbook"
        );
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn mime_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &CellFormats,
) -> Result<()> {
    match cell {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        // Integers past 2^53 are written as text to keep every digit
        CellValue::Int(i) if i.unsigned_abs() > MAX_EXACT_INT => {
            write_text(worksheet, row, col, &i.to_string())?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            if !f.is_finite() {
                return Err(Error::Serialization(format!(
                    "cannot encode {} at row {}, column {}",
                    f,
                    row + 1,
                    col + 1
                )));
            }
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => write_text(worksheet, row, col, s)?,
        CellValue::Date(d) => {
            worksheet.write_datetime_with_format(row, col, d, &formats.date)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, &formats.datetime)?;
        }
    }
    Ok(())
}

fn write_text(worksheet: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<()> {
    if text.chars().count() > MAX_STRING_LEN {
        return Err(Error::Serialization(format!(
            "text at row {}, column {} is longer than {} characters",
            row + 1,
            col + 1,
            MAX_STRING_LEN
        )));
    }
    worksheet.write_string(row, col, text)?;
    Ok(())
}
