//! Row matching algorithm

use crate::model::{canonical_key, KeyIndex, Table};

use super::JoinKind;

/// Row positions contributing to one output row
pub type RowPair = (Option<usize>, Option<usize>);

/// Hash-based row matcher over one key column per table
pub struct RowMatcher {
    left_column: usize,
    right_column: usize,
}

impl RowMatcher {
    pub fn new(left_column: usize, right_column: usize) -> Self {
        Self {
            left_column,
            right_column,
        }
    }

    /// Pair up rows of `left` and `right` for the given join kind.
    ///
    /// Left-driven pairs come first in left row order, each left row's
    /// matches in right row order. Unmatched right rows follow in right
    /// order when the kind keeps them.
    pub fn match_rows(&self, left: &Table, right: &Table, kind: JoinKind) -> Vec<RowPair> {
        let right_index = KeyIndex::build(right, self.right_column);
        let mut matched_right = vec![false; right.row_count()];
        let mut pairs = Vec::new();

        for (left_pos, row) in left.rows.iter().enumerate() {
            let matches = row
                .get(self.left_column)
                .and_then(canonical_key)
                .map(|key| right_index.rows_for(&key))
                .unwrap_or(&[]);

            if matches.is_empty() {
                if kind.keeps_unmatched_left() {
                    pairs.push((Some(left_pos), None));
                }
                continue;
            }

            for &right_pos in matches {
                matched_right[right_pos] = true;
                pairs.push((Some(left_pos), Some(right_pos)));
            }
        }

        if kind.keeps_unmatched_right() {
            pairs.extend(
                matched_right
                    .iter()
                    .enumerate()
                    .filter(|(_, matched)| !**matched)
                    .map(|(right_pos, _)| (None, Some(right_pos))),
            );
        }

        pairs
    }
}
