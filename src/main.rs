//! Libreta main entry point

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libreta_config::{Config, ConfigError, ReportFormat};
use libreta_core::{aggregate_with_cycle, parse_records, BillingCycle, CoreError, RawRecord};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "libreta")]
#[command(author = "Libreta Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Income and expense history by billing period", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the income and expense history grouped by period and day
    Report {
        /// Income export (overrides data.incomes_file)
        #[arg(long)]
        incomes: Option<PathBuf>,
        /// Expense export (overrides data.expenses_file)
        #[arg(long)]
        expenses: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long)]
        format: Option<ReportFormat>,
    },
    /// Average the level and temperature columns of a CSV file
    Summarize {
        csv_path: PathBuf,
        /// Print the averages as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a default configuration file
    InitConfig,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        if let Some(details) = error_details(&e) {
            eprintln!("{}", details);
        }
        std::process::exit(1);
    }
}

/// Severity and details block of a core or config error
fn error_details(error: &anyhow::Error) -> Option<String> {
    if let Some(core) = error.downcast_ref::<CoreError>() {
        return Some(format!("{}: {}", core.severity(), core.to_details()));
    }
    if let Some(config) = error.downcast_ref::<ConfigError>() {
        return Some(format!("{}: {}", config.severity(), config.to_details()));
    }
    None
}

fn run(args: Args) -> anyhow::Result<()> {
    if matches!(args.command, Command::InitConfig) {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args.config)?;

    match args.command {
        Command::Report {
            incomes,
            expenses,
            format,
        } => {
            let incomes_path = incomes.unwrap_or_else(|| config.data.incomes_file.clone());
            let expenses_path = expenses.unwrap_or_else(|| config.data.expenses_file.clone());
            let format = format.unwrap_or(config.report.format);

            let incomes = read_records(&incomes_path)?;
            let expenses = read_records(&expenses_path)?;
            log::info!(
                "Loaded {} incomes from {} and {} expenses from {}",
                incomes.len(),
                incomes_path.display(),
                expenses.len(),
                expenses_path.display()
            );

            let cycle = BillingCycle::new(config.report.cycle_start_day);
            let report = aggregate_with_cycle(&incomes, &expenses, cycle)?;

            match format {
                ReportFormat::Text => print!("{}", render::report_text(&report, &config)),
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Command::Summarize { csv_path, json } => {
            let text = std::fs::read_to_string(&csv_path)
                .with_context(|| format!("Failed to read {}", csv_path.display()))?;
            let summary = libreta_csv::summarize(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render::summary_text(&summary));
            }
        }
        Command::InitConfig => {}
    }

    Ok(())
}

/// Load the configuration and start the logger at its level.
///
/// A missing file at the default path falls back to the defaults; a
/// missing file given explicitly is an error.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    let loaded = Config::load(path);

    let level = match &loaded {
        Ok(config) => config.logging.level.clone(),
        Err(_) => "info".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match loaded {
        Ok(config) => {
            log::debug!("Config loaded from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound { path: missing }) if path == Path::new(DEFAULT_CONFIG_PATH) => {
            log::warn!("Config file {} not found, using defaults", missing);
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Read a JSON export; a missing file counts as an empty collection
fn read_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    if !path.exists() {
        log::warn!("Data file {} not found, treating it as empty", path.display());
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_records(&json).with_context(|| format!("Could not decode {}", path.display()))
}

// ==================== Tests ====================
