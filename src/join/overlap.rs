//! Key overlap validation

use indexmap::IndexSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{canonical_key, Table};

use super::{require_column, Side};

/// Distinct canonical keys, in order of first appearance
pub type KeySet = IndexSet<String>;

/// Distinct non-null canonical keys of one column
pub fn key_set(table: &Table, column_index: usize) -> KeySet {
    table.column_values(column_index).filter_map(canonical_key).collect()
}

/// Keys shared by `left_column` of `left` and `right_column` of `right`.
///
/// The result keeps the order in which keys first appear in `left`.
pub fn overlap(
    left: &Table,
    left_column: &str,
    right: &Table,
    right_column: &str,
) -> Result<KeySet> {
    let left_idx = require_column(left, left_column, Side::Left)?;
    let right_idx = require_column(right, right_column, Side::Right)?;

    let left_keys = key_set(left, left_idx);
    let right_keys = key_set(right, right_idx);
    let common: KeySet = left_keys.intersection(&right_keys).cloned().collect();

    debug!(
        left_keys = left_keys.len(),
        right_keys = right_keys.len(),
        common = common.len(),
        "computed key overlap"
    );

    Ok(common)
}

/// Like [`overlap`], but an empty intersection is an [`Error::NoOverlap`]
pub fn validate(
    left: &Table,
    left_column: &str,
    right: &Table,
    right_column: &str,
) -> Result<KeySet> {
    let common = overlap(left, left_column, right, right_column)?;
    if common.is_empty() {
        return Err(Error::NoOverlap {
            left_column: left_column.to_string(),
            right_column: right_column.to_string(),
        });
    }
    Ok(common)
}
