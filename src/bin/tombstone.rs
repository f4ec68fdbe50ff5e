//! Tombstone CLI
//!
//! Usage:
//!   cargo run --features cli --bin tombstone -- format --input extract.json --pretty
//!   cargo run --features cli --bin tombstone -- format --input extract.json --category parties
//!   cargo run --features cli,database --bin tombstone -- seed-lookups

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use tombstone::{format_snapshot, Category, ExtractBatch, TombstoneConfig};

#[derive(Parser, Debug)]
#[command(name = "tombstone")]
#[command(about = "Format legacy registry extracts into tombstone snapshots")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format an extract batch (JSON) into snapshot documents
    Format {
        /// Extract batch file
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Only format one category (e.g. "parties")
        #[arg(long, short = 'c')]
        category: Option<Category>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Seed the office type and configuration lookup tables
    SeedLookups,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = TombstoneConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Format {
            input,
            category,
            pretty,
            output,
        } => run_format(input, category, pretty, output),
        Command::SeedLookups => seed_lookups(&config).await,
    }
}

fn run_format(
    input: PathBuf,
    category: Option<Category>,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let batch = ExtractBatch::from_path(&input)
        .with_context(|| format!("Failed to read extract {}", input.display()))?;

    let value = match category {
        Some(category) => {
            let section = (category.formatter())(&batch)
                .with_context(|| format!("Failed to format {}", category))?;
            info!(%category, documents = section.len(), "formatted category");
            serde_json::to_value(section)?
        }
        None => serde_json::to_value(format_snapshot(&batch).context("Failed to format snapshot")?)?,
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote snapshot");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

#[cfg(feature = "database")]
async fn seed_lookups(config: &TombstoneConfig) -> Result<()> {
    use sqlx::Connection;

    let url = config.require_database_url()?;
    let mut conn = sqlx::PgConnection::connect(url)
        .await
        .context("Failed to connect to database")?;

    let summary = tombstone::lookup::seed_lookup_data(&mut conn).await?;
    println!(
        "Seeded {} office types and {} configurations",
        summary.office_types, summary.configurations
    );

    conn.close().await?;
    Ok(())
}

#[cfg(not(feature = "database"))]
async fn seed_lookups(_config: &TombstoneConfig) -> Result<()> {
    anyhow::bail!("seed-lookups requires the `database` feature")
}
