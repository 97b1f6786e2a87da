//! salesched CLI - Sales Schedule Engine
//!
//! Command-line interface for converting pipeline workbooks into milestone
//! schedules and checking their configuration sheets.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use salesched::{Renderer, Settings, TextRenderer, Workbook};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "salesched")]
#[command(author, version, about = "Sales milestone schedule engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a pipeline workbook into a schedule
    Convert {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (schedule.xlsx for xlsx; stdout for text and json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,

        /// Settings file (TOML)
        #[arg(short, long, env = "SALESCHED_SETTINGS")]
        settings: Option<PathBuf>,

        /// Reference date for the scheduling window (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Parse and validate the configuration sheets of a workbook
    Check {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Settings file (TOML)
        #[arg(short, long, env = "SALESCHED_SETTINGS")]
        settings: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Text,
    Json,
}

const DEFAULT_OUTPUT: &str = "schedule.xlsx";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v; logs go to stderr so stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(cli.verbose)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Convert {
            file,
            output,
            format,
            settings,
            today,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            cmd_convert(&file, output.as_deref(), format, &settings, today)
        }
        Commands::Check { file, settings } => {
            let settings = load_settings(settings.as_deref())?;
            cmd_check(&file, &settings)
        }
    }
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings: Settings = toml::from_str(&text)
        .with_context(|| format!("Invalid settings file {}", path.display()))?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn cmd_convert(
    file: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    settings: &Settings,
    today: NaiveDate,
) -> Result<()> {
    warn_unknown_format(file);
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let rendered = match format {
        OutputFormat::Xlsx => {
            let xlsx = salesched::process_with(&bytes, settings, today)?;
            let path = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT));
            std::fs::write(path, xlsx)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Schedule written to {}", path.display());
            return Ok(());
        }
        OutputFormat::Text => {
            let grid = derive_grid(&bytes, settings, today)?;
            TextRenderer::new().render(&grid)?
        }
        OutputFormat::Json => {
            let grid = derive_grid(&bytes, settings, today)?;
            let mut json = serde_json::to_string_pretty(&grid)?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn warn_unknown_format(file: &Path) {
    if salesched_parser::detect_format(file).is_none() {
        warn!(path = %file.display(), "unrecognized workbook extension, reading anyway");
    }
}

fn derive_grid(bytes: &[u8], settings: &Settings, today: NaiveDate) -> Result<salesched::OutputGrid> {
    let workbook = Workbook::from_bytes(bytes)?;
    Ok(salesched::derive(&workbook, settings, today)?)
}

fn cmd_check(file: &Path, settings: &Settings) -> Result<()> {
    warn_unknown_format(file);
    let workbook = Workbook::open(file)?;
    let config = salesched_parser::parse_configuration(&workbook, settings)?;

    println!("Configuration OK: {}", file.display());
    println!();
    for rule in config.types_in_order() {
        let marker = if rule.key == config.default_type_key { " (default)" } else { "" };
        if rule.alias.is_empty() {
            println!("{}{marker}", rule.key);
        } else {
            println!("{} [{}]{marker}", rule.key, rule.alias);
        }
        for milestone in &rule.milestones {
            match milestone.specific_weekday {
                Some(day) => println!(
                    "  {:<24} {:>3} workdays before, on {day}",
                    milestone.name, milestone.workdays_before
                ),
                None => println!(
                    "  {:<24} {:>3} workdays before",
                    milestone.name, milestone.workdays_before
                ),
            }
        }
    }
    println!();
    println!("{} sales aliases", config.sales_aliases.len());
    Ok(())
}
