//! Data model for tabular data representation

mod key;
mod schema;
mod table;

pub use key::{canonical_key, KeyIndex};
pub use schema::{unique_names, CellType, Column};
pub use table::{CellValue, Row, Table};
