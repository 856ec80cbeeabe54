//! Column headers and the cell types observed under them

use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

/// Type observed across a column's cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Smallest type that holds values of both `self` and `other`
    pub fn widen(self, other: CellType) -> CellType {
        use CellType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Null, t) | (t, Null) => t,
            (Int, Float) | (Float, Int) => Float,
            (Date, DateTime) | (DateTime, Date) => DateTime,
            _ => Mixed,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, CellType::Int | CellType::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Null => "null",
            CellType::Bool => "bool",
            CellType::Int => "int",
            CellType::Float => "float",
            CellType::String => "string",
            CellType::Date => "date",
            CellType::DateTime => "datetime",
            CellType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One header cell of a loaded or merged table
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    /// Position in the table, starting at 0
    pub index: usize,
    pub inferred_type: CellType,
}

impl Column {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self::with_type(name, index, CellType::Null)
    }

    /// Column carrying a type already known from its source table
    pub fn with_type(name: impl Into<String>, index: usize, inferred_type: CellType) -> Self {
        Self {
            name: name.into(),
            index,
            inferred_type,
        }
    }
}

/// Make column names unique.
///
/// The first occurrence of a name is kept as is; later ones become `name.1`,
/// `name.2`, ... skipping any candidate that is already taken.
pub fn unique_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        if taken.insert(name.clone()) {
            result.push(name);
            continue;
        }

        let mut counter = 1;
        loop {
            let candidate = format!("{}.{}", name, counter);
            if taken.insert(candidate.clone()) {
                result.push(candidate);
                break;
            }
            counter += 1;
        }
    }

    result
}
