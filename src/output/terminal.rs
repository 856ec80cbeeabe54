//! Colored terminal output

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::config::Config;
use crate::error::Result;
use crate::model::{Row, Table};
use crate::pipeline::JoinOutcome;

use super::{OutputFormatter, INPUT_PREVIEW_ROWS};

/// Terminal output with colors
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, writer: &mut dyn WriteColor, left: &Path, right: &Path) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " sheetjoin: {} ⋈ {}", left.display(), right.display())?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_status(&self, writer: &mut dyn WriteColor, color: Color, text: &str) -> Result<()> {
        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", text)?;
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_rows(
        &self,
        writer: &mut dyn WriteColor,
        title: &str,
        table: &Table,
        rows: &[Row],
    ) -> Result<()> {
        writeln!(writer, "{}:", title)?;
        if rows.is_empty() {
            writeln!(writer, "  (no rows)")?;
        } else {
            write!(writer, "{}", build_table(table, rows))?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        outcome: &JoinOutcome,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let report = &outcome.report;
        self.write_header(writer, &report.left_file, &report.right_file)?;

        if config.preview_inputs {
            for (side, table) in [("Left", &outcome.left), ("Right", &outcome.right)] {
                let title = format!("{} file (first {} rows)", side, INPUT_PREVIEW_ROWS);
                self.write_rows(writer, &title, table, table.head(INPUT_PREVIEW_ROWS))?;
            }
        }

        writeln!(writer, "{}: {}", report.kind.label(), report.kind.description())?;
        self.write_status(
            writer,
            Color::Green,
            &format!(
                "✔ Found {} matching {} between '{}' (left) and '{}' (right)",
                report.matched_keys,
                if report.matched_keys == 1 { "key" } else { "keys" },
                report.left_column,
                report.right_column
            ),
        )?;
        writeln!(writer)?;

        if config.preview_rows > 0 {
            let rows = outcome.merged.head(config.preview_rows);
            let title = format!("Result (first {} of {} rows)", rows.len(), report.result_rows);
            self.write_rows(writer, &title, &outcome.merged, rows)?;
        }

        writeln!(
            writer,
            "Total rows in result: {} ({} columns)",
            report.result_rows,
            report.result_columns.len()
        )?;
        self.write_status(
            writer,
            Color::Green,
            &format!("Merged file written to {}", report.output_file.display()),
        )?;

        Ok(())
    }

    fn render_columns(
        &self,
        left: &Table,
        right: &Table,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        for (path, table) in [(&config.left_file, left), (&config.right_file, right)] {
            writeln!(writer, "{} ({} rows):", path.display(), table.row_count())?;
            for column in &table.columns {
                writeln!(
                    writer,
                    "  {:>3}  {} [{}]",
                    column.index + 1,
                    column.name,
                    column.inferred_type
                )?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Explain the usual reasons two key columns share no value
pub fn write_no_overlap_hint(writer: &mut dyn WriteColor) -> Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    writeln!(writer, "Possible causes and fixes:")?;
    writer.reset()?;
    writeln!(writer, "  - The column names may look the same but contain spaces or typos.")?;
    writeln!(
        writer,
        "  - Data types may differ (e.g. one column is text, the other is a number)."
    )?;
    writeln!(writer, "  - Check for extra spaces or leading zeros.")?;
    writeln!(writer, "  - Check the header rows: a wrong offset shifts every column name.")?;
    Ok(())
}

/// Build a box-drawn table from rows
fn build_table(table: &Table, rows: &[Row]) -> String {
    let headers: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    if headers.is_empty() {
        return String::new();
    }

    let mut data: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    data.push(headers);
    for row in rows {
        data.push(row.cells.iter().map(|c| c.display().into_owned()).collect());
    }

    let col_count = data[0].len();
    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in &data {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in col_widths.iter().enumerate() {
            line.push_str(&"─".repeat(*width + 2));
            if i < col_widths.len() - 1 {
                line.push(mid);
            }
        }
        line.push(right);
        line.push('\n');
        line
    };
    let line = |cells: &[String]| {
        let mut line = String::from("│");
        for (i, cell) in cells.iter().enumerate() {
            let width = col_widths.get(i).copied().unwrap_or(0);
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        line.push('\n');
        line
    };

    let mut output = border('┌', '┬', '┐');
    output.push_str(&line(&data[0]));
    output.push_str(&border('├', '┼', '┤'));
    for row in data.iter().skip(1) {
        output.push_str(&line(row));
    }
    output.push_str(&border('└', '┴', '┘'));

    output
}
