use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use html_table_extract::{ExtractionReport, extract_tables_to_json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "html2json",
    version,
    about = "Extract .tb_base tables from HTML pages into JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract marker tables and write keyed JSON records.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input HTML path, or '-' for stdin.
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON path. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Character encoding label of the input, e.g. iso-8859-1.
    #[arg(long)]
    charset: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(args: &ExtractArgs) -> Result<Vec<u8>> {
    if args.input.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read HTML from stdin")?;
        return Ok(buffer);
    }

    std::fs::read(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))
}

fn write_output(args: &ExtractArgs, json: &str) -> Result<()> {
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write JSON to stdout")
        }
    }
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} table={:?} row={:?}: {}",
                warning.code, warning.table, warning.row, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let input = read_input(args)?;
    let (json, report) = extract_tables_to_json(&input, args.charset.as_deref(), args.pretty)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    write_output(args, &json)?;
    Ok(report)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("html_table_extract=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.table_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
