//! Load chart JSON files into the chart store.
//!
//! Each file holds one chart document (`id`, `name`, `type`, `map_url*`,
//! `fixes`). The airport is taken from the id prefix, e.g. `LLBG-SUVAS1`.

use anyhow::{Context, Result};
use clap::Parser;
use sidstar_core::ChartDocument;
use std::path::{Path, PathBuf};

use sidstar_server::config::Config;
use sidstar_server::persistence::{self, charts};
use sidstar_server::logging;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory scanned for *.json chart files when no files are given
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Explicit chart files (relative to --data-dir unless absolute)
    files: Vec<PathBuf>,

    /// Database path (defaults to SIDSTAR_DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    /// Remove existing charts before inserting
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    logging::init_tracing("seed_charts=info", config.log_json)?;

    let database_path = args.database.clone().unwrap_or(config.database_path.clone());
    let db = persistence::init_database(&database_path, config.database_max_connections).await?;

    if args.clear {
        let removed = charts::delete_all_charts(db.pool()).await?;
        tracing::info!("Cleared {} existing charts", removed);
    }

    let files = chart_files(&args)?;
    let mut inserted = 0;
    for path in &files {
        match load_document(path) {
            Ok(document) => match document.into_chart() {
                Ok(chart) => {
                    charts::upsert_chart(db.pool(), &chart).await?;
                    tracing::info!("Read {} ({} fixes)", chart.id, chart.fixes.len());
                    inserted += 1;
                }
                Err(err) => tracing::error!("Skipping {}: {}", path.display(), err),
            },
            Err(err) => tracing::error!("Skipping {}: {:#}", path.display(), err),
        }
    }

    tracing::info!(
        "Inserted {} of {} chart documents into {}",
        inserted,
        files.len(),
        database_path
    );
    Ok(())
}

fn chart_files(args: &Args) -> Result<Vec<PathBuf>> {
    if !args.files.is_empty() {
        return Ok(args
            .files
            .iter()
            .map(|file| {
                if file.is_absolute() {
                    file.clone()
                } else {
                    args.data_dir.join(file)
                }
            })
            .collect());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&args.data_dir)
        .with_context(|| format!("reading {}", args.data_dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn load_document(path: &Path) -> Result<ChartDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("file not found: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid chart JSON in {}", path.display()))
}
