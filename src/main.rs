//! Macro regime CLI
//!
//! Classifies a region's macro regime from FRED-style CSV series files.
//!
//! # Usage
//!
//! ```bash
//! # Current regime, band positions and allocation
//! macro-regime snapshot --region FR --data data/fred
//!
//! # Regime history and duration outlook since 2000, as JSON
//! macro-regime history --region US --data data/fred --start 2000-01-01 --json
//!
//! # Check the series files of a region
//! macro-regime validate --region DE --data data/fred
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use macro_regime::analysis::{AnalyzerConfig, MacroAnalyzer};
use macro_regime::data::{MacroDataset, Region, SeriesLoader};
use macro_regime::validation::SeriesIntegrityValidator;

const SEPARATOR: &str = "============================================================";

/// Macro regime classifier CLI.
#[derive(Parser)]
#[command(name = "macro-regime")]
#[command(about = "Classify inflation/growth regimes from macro indicator series")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Region code (US, EU, FR, DE, IT, GR, CH, JP)
    #[arg(short, long, default_value = "US")]
    region: String,

    /// Directory of <series_code>.csv files
    #[arg(short, long, default_value = "data/fred")]
    data: PathBuf,

    /// Ignore observations before this date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Path to analyzer configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the latest observations
    Snapshot(CommonArgs),

    /// Regime history, durations and trend tags
    History(CommonArgs),

    /// Run integrity checks on the region's series files
    Validate(CommonArgs),
}

fn parse_region(code: &str) -> Result<Region> {
    match Region::from_str(code) {
        Some(region) => Ok(region),
        None => {
            let known: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
            bail!("Unknown region '{}', expected one of {}", code, known.join(", "))
        }
    }
}

fn parse_start(start: Option<&str>) -> Result<Option<NaiveDate>> {
    start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").context("Invalid start date format"))
        .transpose()
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => AnalyzerConfig::from_toml(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn load_dataset(args: &CommonArgs) -> Result<(MacroAnalyzer, MacroDataset)> {
    let region = parse_region(&args.region)?;
    let start = parse_start(args.start.as_deref())?;
    let analyzer = MacroAnalyzer::new(load_config(args.config.as_deref())?)?;

    let dataset = SeriesLoader::new(&args.data)
        .load_region(region, start)
        .with_context(|| format!("Failed to load {} series from {}", region, args.data.display()))?;

    Ok((analyzer, dataset))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_snapshot(args: CommonArgs) -> Result<()> {
    let (analyzer, dataset) = load_dataset(&args)?;
    let snapshot = analyzer
        .snapshot(&dataset)
        .with_context(|| format!("Snapshot failed for {}", dataset.label()))?;

    if args.json {
        return print_json(&snapshot);
    }

    println!("{}", SEPARATOR);
    println!("{}", snapshot.summary());
    for position in [&snapshot.inflation_position, &snapshot.growth_position] {
        if let Some(warning) = position.warning {
            println!("  Warning: {}", warning.message());
        }
    }
    println!("{}", SEPARATOR);
    Ok(())
}

fn cmd_history(args: CommonArgs) -> Result<()> {
    let (analyzer, dataset) = load_dataset(&args)?;
    let history = analyzer
        .history(&dataset)
        .with_context(|| format!("History failed for {}", dataset.label()))?;

    if args.json {
        return print_json(&history);
    }

    println!("{}", SEPARATOR);
    println!("{}", history.summary());
    println!("{}", SEPARATOR);
    Ok(())
}

fn cmd_validate(args: CommonArgs) -> Result<()> {
    let region = parse_region(&args.region)?;
    let config = load_config(args.config.as_deref())?;
    let validator = SeriesIntegrityValidator::new(&args.data, config.snapshot_min_observations());

    let reports = validator
        .validate_region(region)
        .with_context(|| format!("Failed to read {} series from {}", region, args.data.display()))?;

    if args.json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            println!("{}", report.summary());
            for check in report.failed_checks() {
                println!("  FAIL {}: {}", check.name, check.message);
                if let Some(details) = &check.details {
                    println!("       {}", details);
                }
            }
        }
    }

    let failed = reports.iter().filter(|r| !r.all_passed()).count();
    if failed > 0 {
        bail!("{} of {} series failed validation", failed, reports.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("macro_regime=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot(args) => cmd_snapshot(args)?,
        Commands::History(args) => cmd_history(args)?,
        Commands::Validate(args) => cmd_validate(args)?,
    }

    Ok(())
}
