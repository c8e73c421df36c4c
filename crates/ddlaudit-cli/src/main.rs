use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Color;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ddlaudit_core::{Config, Report};
use ddlaudit_sql::SchemaAuditor;

mod input;
mod render;

use input::{InputError, InputSource};
use render::{paint, OutputFormat};

const DEFAULT_CONFIG: &str = "ddlaudit.toml";

/// ddlaudit - Audit Postgres DDL for common anti-patterns
///
/// Findings are advisory: the exit status is zero whenever the audit ran.
#[derive(Parser)]
#[command(name = "ddlaudit")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    ddlaudit schema.sql
    cat schema.sql | ddlaudit -
    ddlaudit migrations/001_init.sql --format json -o report.json")]
struct Cli {
    /// SQL file path, or - for stdin
    file: Option<PathBuf>,

    /// Path to config file (default: ddlaudit.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let source = InputSource::from_arg(cli.file.as_deref());
    let content = match source.read(std::io::stdin().is_terminal()) {
        Ok(content) => content,
        Err(InputError::InteractiveStdin) => {
            Cli::command().print_help()?;
            std::process::exit(1);
        }
        Err(e) => {
            let color = std::io::stderr().is_terminal();
            eprintln!("{}", paint(&format!("Error reading file: {}", e), Color::Red, color));
            std::process::exit(1);
        }
    };

    let config = load_config(cli.config.as_deref())?;

    tracing::debug!(source = %source.name(), bytes = content.len(), "auditing");

    let auditor = SchemaAuditor::new(source.name(), &content);
    let report = auditor.report(&config);

    tracing::info!(
        warnings = report.summary.warnings,
        tables = report.summary.inventory.tables,
        "audit finished"
    );

    match &cli.output {
        Some(path) => {
            write_report(&report, cli.format, path)?;
            if cli.verbose {
                let color = std::io::stderr().is_terminal();
                eprintln!("{} {}", paint("Report saved to:", Color::Green, color), path.display());
            }
        }
        None => {
            let color = std::io::stdout().is_terminal();
            let rendered = render::render(&report, cli.format, color)?;
            print!("{}", rendered);
        }
    }

    Ok(())
}

/// Write the rendered report to `path`, uncolored
fn write_report(report: &Report, format: OutputFormat, path: &Path) -> Result<()> {
    match format {
        OutputFormat::Json => report.save_to_file(path),
        _ => std::fs::write(path, render::render(report, format, false)?),
    }
    .with_context(|| format!("Failed to write report to {}", path.display()))
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        tracing::debug!(path = DEFAULT_CONFIG, "loading config");
        Config::from_file(default_path)
            .with_context(|| format!("Failed to load config {}", DEFAULT_CONFIG))
    } else {
        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}
