//! Output formatting for join reports

mod json;
mod terminal;

use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::model::Table;
use crate::pipeline::JoinOutcome;

pub use json::JsonOutput;
pub use terminal::{write_no_overlap_hint, TerminalOutput};

/// Rows of each input shown by input previews
pub const INPUT_PREVIEW_ROWS: usize = 5;

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render the result of a join
    fn render(
        &self,
        outcome: &JoinOutcome,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()>;

    /// Render the columns of both inputs
    fn render_columns(
        &self,
        left: &Table,
        right: &Table,
        config: &Config,
        writer: &mut dyn WriteColor,
    ) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

fn stdout_for(format: OutputFormat) -> StandardStream {
    match format {
        OutputFormat::Terminal => StandardStream::stdout(ColorChoice::Auto),
        OutputFormat::Json => StandardStream::stdout(ColorChoice::Never),
    }
}

/// Render a join result to stdout
pub fn render_to_stdout(outcome: &JoinOutcome, config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config.output_format);
    let mut stdout = stdout_for(config.output_format);
    formatter.render(outcome, config, &mut stdout)
}

/// Render input columns to stdout
pub fn render_columns_to_stdout(left: &Table, right: &Table, config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config.output_format);
    let mut stdout = stdout_for(config.output_format);
    formatter.render_columns(left, right, config, &mut stdout)
}
