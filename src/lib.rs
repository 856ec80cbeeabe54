//! sheetjoin - Relational joins across spreadsheet files
//!
//! Loads two tabular documents (xlsx, xls, ods, csv) with configurable header
//! rows, checks that the chosen key columns share at least one value, joins
//! them with inner/left/right/full-outer semantics and exports the result as
//! a single-sheet workbook.

pub mod config;
pub mod error;
pub mod export;
pub mod join;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use export::export;
pub use join::{join, overlap, validate, JoinKind, JoinSpec, MergedTable};
pub use model::Table;
pub use parser::load;
pub use pipeline::{JoinOutcome, JoinPipeline, JoinReport};
