//! CLI entry point for the scouting report generator.
//!
//! Reads a scouting form export, aggregates it per team, ranks teams and
//! writes either the spreadsheet report or a JSON summary.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scouting_report::analysis::pipeline::{ScoutingReport, run};
use scouting_report::analysis::scoring::ScoringFormula;
use scouting_report::config::{DuplicatePolicy, MissingValues, PipelineConfig};
use scouting_report::fetch::fetch_bytes;
use scouting_report::output::{print_pretty, write_json, write_workbook};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "scouting_report")]
#[command(about = "Turn match scouting data into a per-team spreadsheet report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the spreadsheet report
    Report {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Workbook to write (replaced if it exists)
        #[arg(short, long, default_value = "output_data.xlsx")]
        output: String,
    },
    /// Print the aggregated data and rankings as JSON
    Summary {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Path or URL of the scouting CSV export
    #[arg(short, long, value_name = "FILE_OR_URL", default_value = "input.csv")]
    input: String,

    /// JSON file with pipeline settings
    #[arg(short, long)]
    config: Option<String>,

    /// How to treat two entries for the same team and match
    #[arg(long, value_enum)]
    duplicates: Option<DuplicatePolicy>,

    /// How blank cells enter the averages
    #[arg(long, value_enum)]
    missing: Option<MissingValues>,

    /// Teleop scoring formula
    #[arg(long, value_enum)]
    formula: Option<ScoringFormula>,

    /// Leaders per ranking column to highlight
    #[arg(long)]
    top: Option<usize>,
}

impl PipelineArgs {
    fn config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        Ok(base.with_overrides(self.duplicates, self.missing, self.formula, self.top))
    }

    fn run(&self) -> Result<ScoutingReport> {
        let config = self.config()?;
        info!(?config, input = %self.input, "Starting run");

        let bytes = fetch_bytes(&self.input)?;
        let report = run(bytes.as_slice(), &config)
            .with_context(|| format!("failed to process '{}'", self.input))?;
        print_pretty(&report);
        Ok(report)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/scouting_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("scouting_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { pipeline, output } => {
            let report = pipeline.run()?;
            write_workbook(&report, Path::new(&output))?;
            info!(output = %output, teams = report.teams.len(), "Report created");
        }
        Commands::Summary { pipeline } => {
            let report = pipeline.run()?;
            write_json(std::io::stdout().lock(), &report)?;
        }
    }

    Ok(())
}
