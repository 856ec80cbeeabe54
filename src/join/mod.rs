//! Join engine: key-overlap validation and relational joins

mod columns;
mod engine;
mod overlap;
mod row_match;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Table;

pub use columns::{merged_columns, KeyColumns, Suffixes};
pub use engine::{join, JoinEngine, MergedTable};
pub use overlap::{key_set, overlap, validate, KeySet};
pub use row_match::{RowMatcher, RowPair};

/// Which input a column or row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Relational join kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    FullOuter,
}

impl JoinKind {
    pub const ALL: [JoinKind; 4] = [
        JoinKind::Inner,
        JoinKind::Left,
        JoinKind::Right,
        JoinKind::FullOuter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::FullOuter => "full_outer",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            JoinKind::Inner => "Inner Join",
            JoinKind::Left => "Left Join",
            JoinKind::Right => "Right Join",
            JoinKind::FullOuter => "Full Outer Join",
        }
    }

    /// One-line explanation of which rows the join keeps
    pub fn description(self) -> &'static str {
        match self {
            JoinKind::Inner => "Returns only matching rows between both files.",
            JoinKind::Left => "Keeps all rows from the first file and matches from the second.",
            JoinKind::Right => "Keeps all rows from the second file and matches from the first.",
            JoinKind::FullOuter => "Returns all rows from both files, even if they don't match.",
        }
    }

    /// Left rows without a match are kept
    pub fn keeps_unmatched_left(self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::FullOuter)
    }

    /// Right rows without a match are kept
    pub fn keeps_unmatched_right(self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::FullOuter)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "full_outer" | "outer" | "full" => Ok(JoinKind::FullOuter),
            _ => Err(Error::UnknownJoinKind(s.to_string())),
        }
    }
}

/// Columns and kind for one join request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left_column: String,
    pub right_column: String,
    pub kind: JoinKind,
}

impl JoinSpec {
    pub fn new(
        left_column: impl Into<String>,
        right_column: impl Into<String>,
        kind: JoinKind,
    ) -> Self {
        Self {
            left_column: left_column.into(),
            right_column: right_column.into(),
            kind,
        }
    }

    /// Validate key overlap, then join with the given engine
    pub fn execute(
        &self,
        engine: &JoinEngine,
        left: &Table,
        right: &Table,
    ) -> Result<(KeySet, MergedTable)> {
        let keys = validate(left, &self.left_column, right, &self.right_column)?;
        let merged = engine.join(left, &self.left_column, right, &self.right_column, self.kind)?;
        Ok((keys, merged))
    }
}

/// Resolve a column name or report it missing
pub(crate) fn require_column(table: &Table, column: &str, side: Side) -> Result<usize> {
    table.column_index(column).ok_or_else(|| Error::ColumnNotFound {
        column: column.to_string(),
        side,
        available: table.column_names().join(", "),
    })
}
