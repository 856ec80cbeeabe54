//! Relational join execution

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{canonical_key, CellValue, Table};

use super::columns::{merged_columns, KeyColumns, Suffixes};
use super::row_match::RowMatcher;
use super::{require_column, JoinKind, Side};

/// Table produced by a join
pub type MergedTable = Table;

/// Join engine
#[derive(Debug, Clone, Default)]
pub struct JoinEngine {
    suffixes: Suffixes,
}

impl JoinEngine {
    /// Create a join engine with custom collision suffixes
    pub fn new(suffixes: Suffixes) -> Self {
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &Suffixes {
        &self.suffixes
    }

    /// Join `left` and `right` on one column each.
    ///
    /// Keys are compared by canonical text form; null or blank keys never
    /// match. A key found k times on the left and m times on the right yields
    /// k×m rows. Join columns sharing a name come out as one column, filled
    /// from the right key on right-only rows.
    pub fn join(
        &self,
        left: &Table,
        left_column: &str,
        right: &Table,
        right_column: &str,
        kind: JoinKind,
    ) -> Result<MergedTable> {
        let left_idx = require_column(left, left_column, Side::Left)?;
        let right_idx = require_column(right, right_column, Side::Right)?;

        let null_keys = left
            .column_values(left_idx)
            .chain(right.column_values(right_idx))
            .filter(|cell| canonical_key(cell).is_none())
            .count();
        if null_keys > 0 {
            warn!(rows = null_keys, "rows with blank join keys never match");
        }

        let pairs = RowMatcher::new(left_idx, right_idx).match_rows(left, right, kind);

        let keys = KeyColumns::new(left_idx, right_idx);
        let shared_key = keys.is_shared(left, right);
        let mut merged = Table::new(merged_columns(left, right, keys, &self.suffixes));
        let width = merged.column_count();

        for (out_idx, (left_pos, right_pos)) in pairs.into_iter().enumerate() {
            let mut cells = Vec::with_capacity(width);
            match left_pos {
                Some(pos) => cells.extend(left.rows[pos].cells.iter().cloned()),
                None => cells.resize(left.column_count(), CellValue::Null),
            }
            match right_pos {
                Some(pos) => {
                    let row = &right.rows[pos];
                    if shared_key && left_pos.is_none() {
                        // Right-only row: the folded key column takes the right key
                        cells[left_idx] = row.cells[right_idx].clone();
                    }
                    cells.extend(
                        row.cells
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| !(shared_key && *i == right_idx))
                            .map(|(_, cell)| cell.clone()),
                    );
                }
                None => cells.resize(width, CellValue::Null),
            }
            merged.add_row(cells, out_idx + 2); // +2 for 1-indexing and header
        }

        merged.infer_column_types();
        debug!(
            kind = %kind,
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            rows = merged.row_count(),
            columns = merged.column_count(),
            "join complete"
        );

        Ok(merged)
    }
}

/// Join with the default `_left` / `_right` collision suffixes
pub fn join(
    left: &Table,
    left_column: &str,
    right: &Table,
    right_column: &str,
    kind: JoinKind,
) -> Result<MergedTable> {
    JoinEngine::default().join(left, left_column, right, right_column, kind)
}
