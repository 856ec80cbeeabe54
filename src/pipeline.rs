//! End-to-end join run: load, validate, join, export

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::export::{Exporter, ExporterFactory};
use crate::join::{JoinEngine, JoinKind, MergedTable};
use crate::model::Table;
use crate::parser::LoaderFactory;

/// Summary of a completed join
#[derive(Debug, Clone, Serialize)]
pub struct JoinReport {
    pub kind: JoinKind,
    pub left_file: PathBuf,
    pub right_file: PathBuf,
    pub left_column: String,
    pub right_column: String,
    pub left_rows: usize,
    pub right_rows: usize,
    /// Distinct key values present in both inputs
    pub matched_keys: usize,
    pub result_rows: usize,
    pub result_columns: Vec<String>,
    pub output_file: PathBuf,
    pub mime_type: String,
}

/// Everything a run produced
#[derive(Debug)]
pub struct JoinOutcome {
    pub report: JoinReport,
    pub left: Table,
    pub right: Table,
    pub merged: MergedTable,
}

/// Runs one join request described by a [`Config`]
pub struct JoinPipeline {
    config: Config,
    loaders: LoaderFactory,
}

impl JoinPipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            loaders: LoaderFactory::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load both input files
    pub fn load_inputs(&self) -> Result<(Table, Table)> {
        self.config.validate_header_rows()?;

        let left = self
            .loaders
            .load_path(&self.config.left_file, &self.config.left_load_options())?;
        let right = self
            .loaders
            .load_path(&self.config.right_file, &self.config.right_load_options())?;

        info!(
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            "files loaded"
        );
        Ok((left, right))
    }

    /// Validate key overlap, join, and write the result file
    pub fn execute(&self, left: Table, right: Table) -> Result<JoinOutcome> {
        self.config.validate()?;
        let spec = self.config.join_spec();

        warn_on_key_type_mismatch(&left, &spec.left_column, &right, &spec.right_column);

        let engine = JoinEngine::new(self.config.suffixes.clone());
        let (keys, merged) = spec.execute(&engine, &left, &right)?;
        info!(matched_keys = keys.len(), kind = %spec.kind, "join keys validated");

        let output_file = self.config.output_path();
        let exporter = ExporterFactory::for_path(&output_file);
        let bytes = exporter.export(&merged)?;
        std::fs::write(&output_file, &bytes)?;
        info!(path = %output_file.display(), rows = merged.row_count(), "merged file written");

        let report = JoinReport {
            kind: spec.kind,
            left_file: self.config.left_file.clone(),
            right_file: self.config.right_file.clone(),
            left_column: spec.left_column.clone(),
            right_column: spec.right_column.clone(),
            left_rows: left.row_count(),
            right_rows: right.row_count(),
            matched_keys: keys.len(),
            result_rows: merged.row_count(),
            result_columns: merged.column_names().into_iter().map(String::from).collect(),
            output_file,
            mime_type: exporter.mime_type().to_string(),
        };

        Ok(JoinOutcome {
            report,
            left,
            right,
            merged,
        })
    }

    /// Load, validate, join and export
    pub fn run(&self) -> Result<JoinOutcome> {
        self.config.validate()?;
        let (left, right) = self.load_inputs()?;
        self.execute(left, right)
    }
}

/// Text keys rarely line up with numeric keys unless the text is clean
fn warn_on_key_type_mismatch(left: &Table, left_column: &str, right: &Table, right_column: &str) {
    let (Some(l), Some(r)) = (left.column(left_column), right.column(right_column)) else {
        return;
    };

    if l.inferred_type.is_numeric() != r.inferred_type.is_numeric() {
        warn!(
            left_type = %l.inferred_type,
            right_type = %r.inferred_type,
            "join columns have different types; keys are compared by their text form"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::export::XlsxExporter;
    use crate::model::CellValue;

    fn write_xlsx(dir: &std::path::Path, name: &str, table: &Table) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, XlsxExporter::new().export(table).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_run_writes_output_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_xlsx(
            dir.path(),
            "farmers.xlsx",
            &Table::from_rows(
                &["farmer_id", "name"],
                vec![
                    vec![CellValue::Int(1), "x".into()],
                    vec![CellValue::Int(2), "y".into()],
                ],
            ),
        );
        let right = write_xlsx(
            dir.path(),
            "payments.xlsx",
            &Table::from_rows(
                &["id", "val"],
                vec![
                    vec!["2".into(), "p".into()],
                    vec!["3".into(), "q".into()],
                ],
            ),
        );
        let output = dir.path().join("out.xlsx");

        let config = Config::new(left, right)
            .with_join_columns("farmer_id", "id")
            .with_join_kind(JoinKind::FullOuter)
            .with_output_file(output.clone());
        let outcome = JoinPipeline::new(config).run().unwrap();

        assert_eq!(outcome.report.matched_keys, 1);
        assert_eq!(outcome.report.result_rows, 3);
        assert_eq!(outcome.report.result_columns, vec!["farmer_id", "name", "id", "val"]);
        assert!(output.exists());
    }

    #[test]
    fn test_run_stops_before_join_without_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_rows(&["id"], vec![vec![CellValue::Int(1)]]);
        let other = Table::from_rows(&["id"], vec![vec![CellValue::Int(5)]]);
        let left = write_xlsx(dir.path(), "a.xlsx", &table);
        let right = write_xlsx(dir.path(), "b.xlsx", &other);
        let output = dir.path().join("never.xlsx");

        let config = Config::new(left, right)
            .with_join_columns("id", "id")
            .with_output_file(output.clone());
        let err = JoinPipeline::new(config).run().unwrap_err();

        assert!(err.is_no_overlap());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("nope.xlsx"), dir.path().join("nope2.xlsx"))
            .with_join_columns("id", "id");
        let err = JoinPipeline::new(config).run().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
