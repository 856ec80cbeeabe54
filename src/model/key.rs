//! Join key normalization
//!
//! Keys are compared through their canonical text form so that the same
//! logical key stored as a number in one sheet and as text in another still
//! matches. The validator and the join engine both go through
//! [`canonical_key`]; nothing else should turn cells into keys.

use rustc_hash::FxHashMap;

use super::table::{CellValue, Table};

/// Canonical text form of a key cell, or `None` for null/blank cells
pub fn canonical_key(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Float(f) if f.is_nan() => None,
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some((*f as i64).to_string())
        }
        CellValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        other => Some(other.text().trim().to_string()),
    }
}

/// Rows of a table grouped by canonical key of one column
#[derive(Debug, Default)]
pub struct KeyIndex {
    groups: FxHashMap<String, Vec<usize>>,
}

impl KeyIndex {
    /// Index the rows of `table` by the column at `column_index`
    pub fn build(table: &Table, column_index: usize) -> Self {
        let mut index = KeyIndex::default();

        for (row_idx, row) in table.rows.iter().enumerate() {
            if let Some(key) = row.get(column_index).and_then(canonical_key) {
                index.groups.entry(key).or_default().push(row_idx);
            }
        }

        index
    }

    /// Row indices holding `key`, in table order
    pub fn rows_for(&self, key: &str) -> &[usize] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys
    pub fn distinct_keys(&self) -> usize {
        self.groups.len()
    }
}
