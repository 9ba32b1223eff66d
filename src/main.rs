//! CLI entry point for the traffic-survey analyzer.
//!
//! Provides subcommands for deriving the daily statistics report from a
//! survey CSV file and for computing the histogram bar layout.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use traffic_survey::chart::{binner, geometry};
use traffic_survey::output::{append_report, report_lines};
use traffic_survey::parser::load_survey;
use traffic_survey::stats::SurveyStats;

#[derive(Parser)]
#[command(name = "traffic_survey")]
#[command(about = "Analyze a daily traffic-survey CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the sixteen survey statistics and append them to a results file
    Analyze {
        /// Survey date; selects traffic_data<DDMMYYYY>.csv
        #[arg(value_name = "DDMMYYYY")]
        date: String,

        /// Explicit CSV path, overriding the date-based file name
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Text file to append the report block to
        #[arg(short, long, default_value = "results.txt")]
        output: String,
    },
    /// Compute the hour-by-junction histogram bar layout as JSON
    Histogram {
        /// Survey date; selects traffic_data<DDMMYYYY>.csv
        #[arg(value_name = "DDMMYYYY")]
        date: String,

        /// Explicit CSV path, overriding the date-based file name
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_survey.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_survey.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { date, file, output } => {
            let (survey_date, path) = resolve_input(&date, file)?;
            let records = load_survey(&path)?;
            let report = SurveyStats::from_records(&records).finalize();

            let file_name = display_name(&path);
            for (label, value) in report_lines(&file_name, &report) {
                println!("{label}: {value}");
            }
            append_report(&output, &file_name, &report)?;
            info!(date = %survey_date, output = %output, "Survey analyzed");
        }
        Commands::Histogram { date, file } => {
            let (survey_date, path) = resolve_input(&date, file)?;
            let records = load_survey(&path)?;
            let stats = SurveyStats::from_records(&records);

            let hours = binner::bin(stats.hourly_matrix());
            let max_count = binner::peak_across_all(stats.hourly_matrix());
            let config = geometry::ChartConfig::default();
            let bars: Vec<_> = geometry::layout(&hours, max_count, config).collect();
            let bar_count = bars.len();

            let doc = serde_json::json!({
                "title": geometry::chart_title(survey_date),
                "legend": geometry::legend(),
                "max_count": max_count,
                "config": config,
                "bars": bars,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
            info!(date = %survey_date, bars = bar_count, "Histogram layout computed");
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Validates the DDMMYYYY survey date and resolves the input path, following
/// the `traffic_data<DDMMYYYY>.csv` naming convention unless an explicit
/// file path was given.
fn resolve_input(date: &str, file: Option<PathBuf>) -> Result<(NaiveDate, PathBuf)> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        bail!("survey date must be 8 digits (DDMMYYYY), got {date:?}");
    }
    let survey_date = NaiveDate::parse_from_str(date, "%d%m%Y")
        .with_context(|| format!("{date:?} is not a valid DDMMYYYY calendar date"))?;
    let year = survey_date.year();
    if !(2000..=2024).contains(&year) {
        bail!("survey year must be between 2000 and 2024, got {year}");
    }

    let path = file.unwrap_or_else(|| PathBuf::from(format!("traffic_data{date}.csv")));
    Ok((survey_date, path))
}
