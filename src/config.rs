//! Configuration handling for sheetjoin

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::export::{Exporter, XlsxExporter};
use crate::join::{JoinKind, JoinSpec, Suffixes};
use crate::parser::LoadOptions;

/// Output format for join reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a join run
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary (left) input file
    pub left_file: PathBuf,
    /// Reference (right) input file
    pub right_file: PathBuf,
    /// Header row of the left file (1-based)
    pub left_header_row: usize,
    /// Header row of the right file (1-based)
    pub right_header_row: usize,
    /// Worksheet to read from the left file
    pub left_sheet: Option<String>,
    /// Worksheet to read from the right file
    pub right_sheet: Option<String>,
    /// Join column in the left file
    pub left_column: String,
    /// Join column in the right file
    pub right_column: String,
    /// Join kind
    pub join_kind: JoinKind,
    /// Suffixes for column names present in both files
    pub suffixes: Suffixes,
    /// Where to write the merged table (defaults to `{kind}_joined_data.xlsx`)
    pub output_file: Option<PathBuf>,
    /// Report format
    pub output_format: OutputFormat,
    /// Rows of the result shown in the report
    pub preview_rows: usize,
    /// Also show the first rows of each input
    pub preview_inputs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            left_file: PathBuf::new(),
            right_file: PathBuf::new(),
            left_header_row: 1,
            right_header_row: 1,
            left_sheet: None,
            right_sheet: None,
            left_column: String::new(),
            right_column: String::new(),
            join_kind: JoinKind::default(),
            suffixes: Suffixes::default(),
            output_file: None,
            output_format: OutputFormat::default(),
            preview_rows: 10,
            preview_inputs: false,
        }
    }
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(left_file: PathBuf, right_file: PathBuf) -> Self {
        Self {
            left_file,
            right_file,
            ..Default::default()
        }
    }

    /// Set the join columns
    pub fn with_join_columns(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_column = left.into();
        self.right_column = right.into();
        self
    }

    /// Set the join kind
    pub fn with_join_kind(mut self, kind: JoinKind) -> Self {
        self.join_kind = kind;
        self
    }

    /// Set the 1-based header rows
    pub fn with_header_rows(mut self, left: usize, right: usize) -> Self {
        self.left_header_row = left;
        self.right_header_row = right;
        self
    }

    /// Set the worksheets to read
    pub fn with_sheets(mut self, left: Option<String>, right: Option<String>) -> Self {
        self.left_sheet = left;
        self.right_sheet = right;
        self
    }

    /// Set collision suffixes
    pub fn with_suffixes(mut self, suffixes: Suffixes) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Set output file
    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.output_file = Some(path);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the number of result rows to preview
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Show input previews
    pub fn with_preview_inputs(mut self, preview: bool) -> Self {
        self.preview_inputs = preview;
        self
    }

    /// Check the settings a run depends on
    pub fn validate(&self) -> Result<()> {
        self.validate_header_rows()?;
        if self.left_column.is_empty() || self.right_column.is_empty() {
            return Err(Error::Config("both join columns must be given".to_string()));
        }
        if self.suffixes.left == self.suffixes.right {
            return Err(Error::Config(format!(
                "left and right suffixes must differ (both are '{}')",
                self.suffixes.left
            )));
        }
        Ok(())
    }

    /// Header rows are 1-based; zero is rejected
    pub fn validate_header_rows(&self) -> Result<()> {
        if self.left_header_row == 0 || self.right_header_row == 0 {
            return Err(Error::Config("header rows start from 1".to_string()));
        }
        Ok(())
    }

    /// Loader options for the left file
    pub fn left_load_options(&self) -> LoadOptions {
        load_options(self.left_header_row, &self.left_sheet)
    }

    /// Loader options for the right file
    pub fn right_load_options(&self) -> LoadOptions {
        load_options(self.right_header_row, &self.right_sheet)
    }

    /// The join request described by this config
    pub fn join_spec(&self) -> JoinSpec {
        JoinSpec::new(&self.left_column, &self.right_column, self.join_kind)
    }

    /// Output path, falling back to `{kind}_joined_data.xlsx`
    pub fn output_path(&self) -> PathBuf {
        match self.output_file {
            Some(ref path) => path.clone(),
            None => PathBuf::from(XlsxExporter::new().file_name(self.join_kind)),
        }
    }
}

/// Convert a 1-based header row into loader options
fn load_options(header_row: usize, sheet: &Option<String>) -> LoadOptions {
    let options = LoadOptions::new(header_row.saturating_sub(1));
    match sheet {
        Some(name) => options.with_sheet_name(name.clone()),
        None => options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("a.xlsx".into(), "b.xlsx".into()).with_join_columns("id", "cust")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.left_header_row, 1);
        assert_eq!(config.join_kind, JoinKind::Inner);
        assert_eq!(config.preview_rows, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_header_rows_are_converted_to_zero_based() {
        let config = config()
            .with_header_rows(3, 1)
            .with_sheets(Some("Data".to_string()), None);
        let left = config.left_load_options();
        assert_eq!(left.header_row, 2);
        assert_eq!(left.sheet_name.as_deref(), Some("Data"));
        assert_eq!(config.right_load_options().header_row, 0);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(matches!(config().with_header_rows(0, 1).validate(), Err(Error::Config(_))));
        assert!(matches!(
            config().with_suffixes(Suffixes::new("_x", "_x")).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::new("a.xlsx".into(), "b.xlsx".into()).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            config().with_join_kind(JoinKind::Left).output_path(),
            PathBuf::from("left_joined_data.xlsx")
        );
        assert_eq!(
            config().with_output_file("out.csv".into()).output_path(),
            PathBuf::from("out.csv")
        );
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
