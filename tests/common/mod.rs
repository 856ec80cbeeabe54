//! Spreadsheet fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use sheetjoin::export::{Exporter, XlsxExporter};
use sheetjoin::model::{CellValue, Table};

/// Write `table` as an xlsx workbook under `dir`
pub fn write_table(dir: &Path, name: &str, table: &Table) -> PathBuf {
    let path = dir.join(name);
    let bytes = XlsxExporter::new().export(table).expect("export fixture");
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// A = [{id:1,name:"x"},{id:2,name:"y"}]
pub fn people() -> Table {
    Table::from_rows(
        &["id", "name"],
        vec![
            vec![CellValue::Int(1), "x".into()],
            vec![CellValue::Int(2), "y".into()],
        ],
    )
}

/// B = [{id:2,val:"p"},{id:3,val:"q"}]
pub fn values() -> Table {
    Table::from_rows(
        &["id", "val"],
        vec![
            vec![CellValue::Int(2), "p".into()],
            vec![CellValue::Int(3), "q".into()],
        ],
    )
}

/// Workbook with two title rows above the header on row 3
pub fn write_report_with_title(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "Payments export").expect("title");
    sheet.write_string(1, 0, "Generated monthly").expect("subtitle");
    sheet.write_string(2, 0, "cust_id").expect("header");
    sheet.write_string(2, 1, "amount").expect("header");
    sheet.write_string(3, 0, "2").expect("cell");
    sheet.write_number(3, 1, 250.5).expect("cell");
    sheet.write_string(4, 0, "2").expect("cell");
    sheet.write_number(4, 1, 10).expect("cell");
    sheet.write_string(5, 0, "7").expect("cell");
    sheet.write_number(5, 1, 99).expect("cell");

    workbook.save(&path).expect("save fixture");
    path
}
