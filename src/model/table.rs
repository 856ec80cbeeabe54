//! In-memory tables as produced by the loaders and the join engine

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::schema::{CellType, Column};

/// One spreadsheet cell
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Values are equal only within the same variant. `Int(2)` and `Float(2.0)`
/// differ here; key matching goes through `canonical_key` instead.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (String(a), String(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Preview form; nulls read `NULL`
    pub fn display(&self) -> Cow<'_, str> {
        if self.is_null() {
            Cow::Borrowed("NULL")
        } else {
            self.text()
        }
    }

    /// Plain text form, as written to CSV and used for key comparison
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_owned()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

/// A data row, always as wide as its table
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<CellValue>,
    /// 1-based row number in the source sheet
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows.
///
/// Every row holds exactly one cell per column. Tables are not mutated once
/// loaded; the join engine only ever borrows them.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from column names and row values.
    ///
    /// Names are made unique the same way the loaders do it.
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<CellValue>>) -> Self {
        let columns = super::schema::unique_names(names.iter().map(|n| n.as_ref()))
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();

        let mut table = Table::new(columns);
        for (i, cells) in rows.into_iter().enumerate() {
            table.add_row(cells, i + 2); // +2 for 1-indexing and header
        }
        table.infer_column_types();
        table
    }

    /// Add a row, padding with nulls or truncating to the column count
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        cells.resize(self.column_count(), CellValue::Null);
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Iterate over the values of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Recompute the observed type of every column
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.column_count() {
            let inferred = self
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .fold(CellType::Null, |acc, cell| acc.widen(cell.cell_type()));

            if let Some(col) = self.columns.get_mut(col_idx) {
                col.inferred_type = inferred;
            }
        }
    }
}
