//! Polyresolve Explain Binary
//!
//! Run with: `polyresolve-explain [OPTIONS] [TABLE...]`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use polyresolve_explain::{explain, CallReport, Config, DispatchTable, OutputFormat, Summary};

#[derive(Parser)]
#[command(name = "polyresolve-explain")]
#[command(about = "Resolve the calls declared in dispatch table files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dispatch table files (TOML)
    #[arg(value_name = "TABLE")]
    tables: Vec<PathBuf>,

    /// Fail if any call does not meet its expectation
    #[arg(short, long)]
    check: bool,

    /// Output format (overrides the configuration file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(Commands::Config) = &cli.command {
        let config = Config::default();
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let config = build_config(&cli)?;

    if cli.tables.is_empty() {
        anyhow::bail!("no dispatch table given");
    }

    let mut reports = Vec::new();
    for path in &cli.tables {
        reports.extend(process_table(path)?);
    }

    print_reports(&reports, &config)?;
    let total = Summary::of(&reports);

    info!(
        "Resolved {} calls, {} unresolved, {} not as expected",
        total.calls, total.unresolved, total.mismatched
    );

    if (cli.check && total.mismatched > 0) || (config.fail_on_unresolved && total.unresolved > 0) {
        std::process::exit(1);
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Override with CLI options
    if let Some(format) = cli.format {
        config.format = format;
    }

    Ok(config)
}

fn process_table(path: &Path) -> Result<Vec<CallReport>> {
    debug!("Processing: {}", path.display());

    let table = DispatchTable::load(path)
        .with_context(|| format!("Failed to load dispatch table: {}", path.display()))?;
    Ok(explain(&table))
}

fn print_reports(reports: &[CallReport], config: &Config) -> Result<()> {
    match config.format {
        OutputFormat::Text => {
            for report in reports {
                println!("{}", report.render_text(config));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
    }
    Ok(())
}
