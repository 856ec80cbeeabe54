//! Spreadsheet loader (xlsx, xlsm, xlsb, xls, ods)

use std::borrow::Cow;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::Timelike;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{CellValue, Table};

use super::{header_columns, header_out_of_range, LoadOptions, Loader};

/// Loader for spreadsheet workbooks
pub struct ExcelLoader;

impl Loader for ExcelLoader {
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| Error::Parse(format!("Not a recognized spreadsheet document: {}", e)))?;

        let sheet_name = match options.sheet_name {
            Some(ref name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| Error::Parse("No sheets found in workbook".to_string()))?,
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| Error::Parse(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        debug!(sheet = %sheet_name, header_row = options.header_row, "loading worksheet");
        parse_range(&range, options.header_row)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(
            ext.to_lowercase().as_str(),
            "xlsx" | "xls" | "ods" | "xlsm" | "xlsb" | "xla" | "xlam"
        )
    }
}

/// Turn a worksheet range into a table.
///
/// `header_row` is an absolute zero-based sheet row; calamine ranges start at
/// the first used cell, so rows above the range are blank.
fn parse_range(range: &Range<Data>, header_row: usize) -> Result<Table> {
    let (Some((start_row, start_col)), Some((end_row, _))) = (range.start(), range.end()) else {
        return Err(Error::Parse("Empty sheet".to_string()));
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;
    let end_row = end_row as usize;

    let sheet_rows = end_row + 1;
    if header_row >= sheet_rows {
        return Err(header_out_of_range(header_row, sheet_rows));
    }
    if header_row < start_row {
        return Err(Error::Parse(format!("Header row {} is empty", header_row + 1)));
    }

    let mut rows = range.rows().skip(header_row - start_row);
    let header = rows
        .next()
        .ok_or_else(|| header_out_of_range(header_row, sheet_rows))?;
    let raw_names: Vec<String> = header.iter().map(cell_to_string).collect();
    let columns = header_columns(&raw_names, start_col);

    if columns.is_empty() {
        return Err(Error::Parse(format!("Header row {} is empty", header_row + 1)));
    }

    let width = columns.len();
    let mut table = Table::new(columns);
    let mut truncated = 0usize;

    for (offset, row) in rows.enumerate() {
        if row.iter().skip(width).any(|cell| !matches!(cell, Data::Empty)) {
            truncated += 1;
        }

        let cells: Vec<CellValue> = row.iter().take(width).map(convert_cell).collect();
        table.add_row(cells, header_row + offset + 2); // +2 for 1-indexing and header
    }

    if truncated > 0 {
        warn!(
            rows = truncated,
            columns = width,
            "rows have values beyond the header width; extra cells dropped"
        );
    }

    table.infer_column_types();
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded worksheet"
    );

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.to_string(),
            None => format!("{}", dt),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if is_midnight(&datetime) => CellValue::Date(datetime.date()),
            Some(datetime) => CellValue::DateTime(datetime),
            None => CellValue::String(Cow::Owned(format!("{}", dt))),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}

fn is_midnight(datetime: &chrono::NaiveDateTime) -> bool {
    datetime.num_seconds_from_midnight() == 0 && datetime.nanosecond() == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[((u32, u32), Data)]) -> Range<Data> {
        let start = cells.iter().map(|(p, _)| *p).min().unwrap_or((0, 0));
        let end_row = cells.iter().map(|((r, _), _)| *r).max().unwrap_or(0);
        let end_col = cells.iter().map(|((_, c), _)| *c).max().unwrap_or(0);
        let start_col = cells.iter().map(|((_, c), _)| *c).min().unwrap_or(0);
        let mut range = Range::new((start.0, start_col), (end_row, end_col));
        for (pos, value) in cells {
            range.set_value(*pos, value.clone());
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_parse_range_with_header_offset() {
        let range = sheet(&[
            ((0, 0), s("Quarterly export")),
            ((1, 0), s("id")),
            ((1, 1), s("name")),
            ((2, 0), Data::Float(1.0)),
            ((2, 1), s("x")),
            ((3, 0), Data::Float(2.0)),
            ((3, 1), s("y")),
        ]);

        let table = parse_range(&range, 1).unwrap();
        assert_eq!(table.column_names(), vec!["id", "name"]);
        // sheet rows - header_row - 1
        assert_eq!(table.row_count(), 4 - 1 - 1);
        assert_eq!(table.rows[0].cells[0], CellValue::Int(1));
        assert_eq!(table.rows[1].source_line, 4);
    }

    #[test]
    fn test_parse_range_header_out_of_range() {
        let range = sheet(&[((0, 0), s("id")), ((1, 0), Data::Float(1.0))]);
        assert!(matches!(parse_range(&range, 2), Err(Error::Parse(_))));
        assert!(matches!(parse_range(&range, 5), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_range_pads_and_truncates() {
        let range = sheet(&[
            ((0, 0), s("a")),
            ((0, 1), s("b")),
            ((1, 0), s("only a")),
            ((2, 0), s("1")),
            ((2, 1), s("2")),
            ((2, 2), s("extra")),
        ]);

        let table = parse_range(&range, 0).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[0].cells[1], CellValue::Null);
        assert_eq!(table.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_parse_range_duplicate_and_blank_headers() {
        let range = sheet(&[
            ((0, 0), s("id")),
            ((0, 2), s("id")),
            ((1, 0), Data::Float(1.0)),
        ]);

        let table = parse_range(&range, 0).unwrap();
        assert_eq!(table.column_names(), vec!["id", "Unnamed: 1", "id.1"]);
    }

    #[test]
    fn test_parse_range_blank_header_row() {
        let range = sheet(&[((2, 0), s("id")), ((3, 0), Data::Float(1.0))]);
        assert!(matches!(parse_range(&range, 0), Err(Error::Parse(_))));
        assert_eq!(parse_range(&range, 2).unwrap().row_count(), 1);
    }

    #[test]
    fn test_is_midnight() {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(is_midnight(&day.and_hms_opt(0, 0, 0).unwrap()));
        assert!(!is_midnight(&day.and_hms_opt(9, 30, 0).unwrap()));
        assert!(!is_midnight(&day.and_hms_milli_opt(0, 0, 0, 5).unwrap()));
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Null);
        assert_eq!(convert_cell(&s("  ")), CellValue::Null);
        assert_eq!(convert_cell(&Data::Float(3.0)), CellValue::Int(3));
        assert_eq!(convert_cell(&Data::Float(3.25)), CellValue::Float(3.25));
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_load_rejects_non_spreadsheet_bytes() {
        let err = ExcelLoader
            .load(b"id,name\n1,x\n", &LoadOptions::new(0))
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
