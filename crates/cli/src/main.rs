// colorqc CLI - consolidate color test results from quality-control cards

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colorqc_core::{AggregateTable, ExtractConfig};
use colorqc_io::{write_aggregate, BatchLoader, BatchReport, ExportResult, RunSummary};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use exit_codes::{extract_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_SUCCESS, EXIT_USAGE};

const DEFAULT_OUTPUT: &str = "color_data.xlsx";

#[derive(Parser)]
#[command(name = "colorqc")]
#[command(about = "Extract color test results from a directory of quality-control cards")]
#[command(version)]
#[command(after_help = "\
Examples:
  colorqc ./qc-cards
  colorqc ./qc-cards -o color_data.csv
  colorqc ./qc-cards --config instrument.toml --json
  RUST_LOG=debug colorqc ./qc-cards")]
struct Cli {
    /// Directory containing .xls / .xlsx quality-control cards
    #[arg(env = "COLORQC_SOURCE_DIR")]
    source_dir: PathBuf,

    /// Output file (.xlsx, .csv or .tsv)
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TOML file overriding color test labels, extensions and card layout
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress the human summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn new(code: u8, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// JSON report: the batch summary plus what was written.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    summary: RunSummary,
    output: String,
    columns: &'a [String],
    rows: usize,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr. `RUST_LOG` overrides the default level.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref()).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("{e:#}"))
            .with_hint("every key is optional; see `colorqc --help`")
    })?;
    debug!(source = %cli.source_dir.display(), output = %cli.output.display(), "starting run");

    let loader = BatchLoader::new(config).exclude(&cli.output);
    let report = loader.load_all(&cli.source_dir).map_err(|e| {
        CliError::new(extract_exit_code(&e), e.to_string())
            .with_hint("pass the directory holding the .xls/.xlsx cards")
    })?;

    let aggregate = report.aggregate();
    let export = write_aggregate(&aggregate, &cli.output)
        .map_err(|e| CliError::new(extract_exit_code(&e), e.to_string()))?;

    if cli.json {
        print_json(&report, &aggregate, &cli.output)?;
    } else if !cli.quiet {
        print_summary(&report, &export, &cli.output);
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ExtractConfig> {
    let Some(path) = path else {
        return Ok(ExtractConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config = ExtractConfig::from_toml(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn print_json(report: &BatchReport, aggregate: &AggregateTable, output: &Path) -> Result<(), CliError> {
    let json = JsonReport {
        summary: report.summary(),
        output: output.display().to_string(),
        columns: aggregate.headers(),
        rows: aggregate.row_count(),
    };
    let text = serde_json::to_string_pretty(&json)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot serialize report: {e}")))?;
    println!("{}", text);
    Ok(())
}

fn print_summary(report: &BatchReport, export: &ExportResult, output: &Path) {
    let read = report.outcomes.len();
    let failed = report.failures().count();
    let with_data = report.files_with_data();
    let without_data = read - failed - with_data;

    println!(
        "Read {} file{} from {}: {} with color data, {} without, {} skipped",
        read,
        if read == 1 { "" } else { "s" },
        report.source_dir.display(),
        with_data,
        without_data,
        failed,
    );

    if failed > 0 {
        println!("Skipped (check these files manually):");
        for (path, error) in report.failures() {
            println!("  {}: {}", path.display(), error);
        }
    }

    if report.is_empty_result() {
        println!("No color test data found; wrote empty {}", output.display());
    } else {
        println!("Wrote {} to {}", export.summary(), output.display());
    }
}
