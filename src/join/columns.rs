//! Column naming for merged tables

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::model::{unique_names, Column, Table};

/// Suffixes appended to non-key column names present in both inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffixes {
    pub left: String,
    pub right: String,
}

impl Suffixes {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl Default for Suffixes {
    fn default() -> Self {
        Self::new("_left", "_right")
    }
}

/// Positions of the join column in each input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub left: usize,
    pub right: usize,
}

impl KeyColumns {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Both join columns carry the same name and are emitted as one column
    pub fn is_shared(&self, left: &Table, right: &Table) -> bool {
        left.columns[self.left].name == right.columns[self.right].name
    }
}

/// Columns of a merged table: all left columns, then the right columns.
///
/// Join columns keep their names. When both join columns have the same name
/// the right one is folded into the left one. Any other name found in both
/// tables gets the side's suffix, and names that still clash afterwards are
/// made unique with `.N`.
pub fn merged_columns(
    left: &Table,
    right: &Table,
    keys: KeyColumns,
    suffixes: &Suffixes,
) -> Vec<Column> {
    let shared_key = keys.is_shared(left, right);
    let left_names: FxHashSet<&str> = left.columns.iter().map(|c| c.name.as_str()).collect();
    let right_names: FxHashSet<&str> = right.columns.iter().map(|c| c.name.as_str()).collect();

    let left_iter = left.columns.iter().enumerate().map(|(i, c)| {
        if i != keys.left && right_names.contains(c.name.as_str()) {
            (format!("{}{}", c.name, suffixes.left), c)
        } else {
            (c.name.clone(), c)
        }
    });
    let right_iter = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| !(shared_key && *i == keys.right))
        .map(|(i, c)| {
            if i != keys.right && left_names.contains(c.name.as_str()) {
                (format!("{}{}", c.name, suffixes.right), c)
            } else {
                (c.name.clone(), c)
            }
        });

    let (names, sources): (Vec<String>, Vec<&Column>) = left_iter.chain(right_iter).unzip();

    unique_names(names)
        .into_iter()
        .zip(sources)
        .enumerate()
        .map(|(i, (name, source))| Column::with_type(name, i, source.inferred_type))
        .collect()
}
