//! Loader layer for reading spreadsheet documents into tables

mod csv;
mod excel;

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{unique_names, Column, Table};

pub use self::csv::CsvLoader;
pub use self::excel::ExcelLoader;

/// Options for a single load
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Zero-based sheet row holding the column names
    pub header_row: usize,
    /// Worksheet to read (first sheet when unset)
    pub sheet_name: Option<String>,
}

impl LoadOptions {
    pub fn new(header_row: usize) -> Self {
        Self {
            header_row,
            sheet_name: None,
        }
    }

    /// Set the worksheet name
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }
}

/// Trait for loading tabular documents from bytes
pub trait Loader: Send + Sync {
    /// Parse a document and return a Table
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Table>;

    /// Check if this loader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Load a spreadsheet document (xlsx, xlsm, xlsb, xls, ods) from bytes.
///
/// `header_row` is zero-based; rows above it are discarded.
pub fn load(bytes: &[u8], header_row: usize) -> Result<Table> {
    ExcelLoader.load(bytes, &LoadOptions::new(header_row))
}

/// Factory for picking a loader based on file extension
pub struct LoaderFactory {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderFactory {
    /// Create a new loader factory with all supported loaders
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Box::new(ExcelLoader),
                Box::new(CsvLoader::comma()),
                Box::new(CsvLoader::tab()),
            ],
        }
    }

    /// Get a loader for the given file path
    pub fn get_loader(&self, path: &Path) -> Option<&dyn Loader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.loaders
            .iter()
            .find(|loader| loader.supports_extension(&ext))
            .map(|loader| loader.as_ref())
    }

    /// Read a file and load it with the matching loader
    pub fn load_path(&self, path: &Path, options: &LoadOptions) -> Result<Table> {
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read input file");

        match self.get_loader(path) {
            Some(loader) => loader.load(&bytes, options),
            None => match detect_format(&bytes) {
                Some(format) => {
                    debug!(format, "detected spreadsheet format from content");
                    ExcelLoader.load(&bytes, options)
                }
                None => Err(Error::Parse(format!(
                    "Unsupported file format: {}",
                    path.extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                ))),
            },
        }
    }
}

/// Detect a spreadsheet container from its magic bytes
pub fn detect_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }

    // ZIP container (xlsx, xlsm, ods)
    if &bytes[0..4] == b"PK\x03\x04" {
        return Some("zip");
    }

    // OLE compound document (xls)
    if &bytes[0..4] == b"\xD0\xCF\x11\xE0" {
        return Some("xls");
    }

    None
}

/// Build column definitions from raw header cells.
///
/// The header spans up to its last non-blank cell. Blank cells inside that
/// span are named `Unnamed: {index}` and duplicates are made unique.
pub(crate) fn header_columns(raw: &[String], first_index: usize) -> Vec<Column> {
    let width = raw
        .iter()
        .rposition(|name| !name.trim().is_empty())
        .map_or(0, |last| last + 1);

    let names = raw[..width].iter().enumerate().map(|(i, name)| {
        let name = name.trim();
        if name.is_empty() {
            format!("Unnamed: {}", first_index + i)
        } else {
            name.to_string()
        }
    });

    unique_names(names)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::new(name, i))
        .collect()
}

/// Error for a header row that lies past the end of the sheet
pub(crate) fn header_out_of_range(header_row: usize, sheet_rows: usize) -> Error {
    Error::Parse(format!(
        "Header row {} is beyond the end of the sheet ({} rows)",
        header_row + 1,
        sheet_rows
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_columns_trims_trailing_blanks() {
        let columns = header_columns(&raw(&["id", "", "name", "", ""]), 0);
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "Unnamed: 1", "name"]);
    }

    #[test]
    fn test_header_columns_dedupes() {
        let columns = header_columns(&raw(&[" id ", "id", "id"]), 0);
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "id.1", "id.2"]);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"PK\x03\x04rest"), Some("zip"));
        assert_eq!(detect_format(b"\xD0\xCF\x11\xE0rest"), Some("xls"));
        assert_eq!(detect_format(b"id,name\n"), None);
        assert_eq!(detect_format(b"PK"), None);
    }

    #[test]
    fn test_factory_picks_loader_by_extension() {
        let factory = LoaderFactory::new();
        assert!(factory.get_loader(Path::new("a.xlsx")).is_some());
        assert!(factory.get_loader(Path::new("a.ODS")).is_some());
        assert!(factory.get_loader(Path::new("a.csv")).is_some());
        assert!(factory.get_loader(Path::new("a.bin")).is_none());
    }
}
