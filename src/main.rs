//! sheetjoin - Relational joins across spreadsheet files

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use sheetjoin::config::{Config, OutputFormat};
use sheetjoin::join::{JoinKind, Suffixes};
use sheetjoin::output::{render_columns_to_stdout, render_to_stdout, write_no_overlap_hint};
use sheetjoin::{Error, JoinPipeline};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Join two spreadsheet files on a matching column (Excel, ODS, CSV)
#[derive(Parser, Debug)]
#[command(name = "sheetjoin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Primary (left) file
    left_file: PathBuf,

    /// Reference (right) file
    right_file: PathBuf,

    /// Join column present under the same name in both files
    #[arg(long, conflicts_with_all = ["left_on", "right_on"])]
    on: Option<String>,

    /// Join column in the left file
    #[arg(long, requires = "right_on")]
    left_on: Option<String>,

    /// Join column in the right file
    #[arg(long, requires = "left_on")]
    right_on: Option<String>,

    /// Join kind: inner, left, right or full_outer
    #[arg(short = 'j', long = "how", default_value = "inner")]
    how: String,

    /// Header row of the left file (starting from 1)
    #[arg(long, default_value_t = 1)]
    left_header: usize,

    /// Header row of the right file (starting from 1)
    #[arg(long, default_value_t = 1)]
    right_header: usize,

    /// Worksheet to read from the left file (default: first sheet)
    #[arg(long)]
    left_sheet: Option<String>,

    /// Worksheet to read from the right file (default: first sheet)
    #[arg(long)]
    right_sheet: Option<String>,

    /// Output file (default: {how}_joined_data.xlsx; a .csv path writes CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suffixes for column names found in both files (comma-separated)
    #[arg(long, value_delimiter = ',', default_values = ["_left", "_right"])]
    suffixes: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Result rows to preview
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Also preview the first rows of each input
    #[arg(long)]
    preview_inputs: bool,

    /// Print the columns of both files and exit
    #[arg(long)]
    list_columns: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if is_no_overlap(&e) {
                let mut stderr = StandardStream::stderr(ColorChoice::Auto);
                let _ = write_no_overlap_hint(&mut stderr);
                ExitCode::from(1) // Keys do not overlap
            } else {
                ExitCode::from(2)
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sheetjoin=debug" } else { "sheetjoin=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_no_overlap(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<Error>().is_some_and(Error::is_no_overlap))
}

fn run(cli: Cli) -> Result<()> {
    let join_kind: JoinKind = cli.how.parse()?;

    let (left_column, right_column) = match (cli.on, cli.left_on, cli.right_on) {
        (Some(on), _, _) => (on.clone(), on),
        (None, Some(left), Some(right)) => (left, right),
        _ if cli.list_columns => (String::new(), String::new()),
        _ => anyhow::bail!("join columns are required: use --on or --left-on/--right-on"),
    };

    let suffixes = match cli.suffixes.as_slice() {
        [left, right] => Suffixes::new(left.clone(), right.clone()),
        _ => anyhow::bail!("--suffixes takes exactly two values"),
    };

    let mut config = Config::new(cli.left_file, cli.right_file)
        .with_join_columns(left_column, right_column)
        .with_join_kind(join_kind)
        .with_header_rows(cli.left_header, cli.right_header)
        .with_sheets(cli.left_sheet, cli.right_sheet)
        .with_suffixes(suffixes)
        .with_output_format(cli.format.into())
        .with_preview_rows(cli.preview)
        .with_preview_inputs(cli.preview_inputs);
    if let Some(output) = cli.output {
        config = config.with_output_file(output);
    }

    let pipeline = JoinPipeline::new(config);
    let config = pipeline.config();

    let (left, right) = pipeline.load_inputs().with_context(|| {
        format!(
            "Failed to load input files (left: {}, right: {})",
            config.left_file.display(),
            config.right_file.display()
        )
    })?;

    if cli.list_columns {
        render_columns_to_stdout(&left, &right, config)?;
        return Ok(());
    }

    let outcome = pipeline
        .execute(left, right)
        .with_context(|| format!("Failed to run {}", config.join_kind.label().to_lowercase()))?;

    render_to_stdout(&outcome, config)?;

    Ok(())
}
