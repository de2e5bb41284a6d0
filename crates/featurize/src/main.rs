//! Featurize - JSON records to feature table

mod output;
mod records;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use feature_builder::GroupConfig;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Output encoding of the assembled table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "featurize", version, about = "Assemble JSON records into a numeric feature table")]
struct Cli {
    /// Group definition (TOML or JSON, by extension)
    #[arg(short, long, env = "FEATURIZE_SCHEMA")]
    schema: PathBuf,

    /// JSON array of records, one object per row
    records: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Initialize the tracing subscriber on stderr
fn init_logging(verbose: u8, json: bool) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

fn run(cli: &Cli) -> Result<()> {
    let config = GroupConfig::load(&cli.schema)
        .with_context(|| format!("loading group definition {}", cli.schema.display()))?;
    let mut group = config.build().context("building feature group")?;

    let records = records::read(&cli.records)?;
    let rows = records::feed(&mut group, &records)?;
    info!("Recorded {} rows from {}", rows, cli.records.display());

    let table = group.array().context("assembling feature table")?;
    let (rows, columns) = table.shape();
    info!("Assembled table: {} rows x {} columns", rows, columns);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.format {
        OutputFormat::Csv => output::write_csv(&table, &mut out)?,
        OutputFormat::Json => output::write_json(&table, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    info!("=== Featurize v{} ===", env!("CARGO_PKG_VERSION"));
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "featurize", "-s", "schema.toml", "rows.json", "-f", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.records, PathBuf::from("rows.json"));
    }
}
