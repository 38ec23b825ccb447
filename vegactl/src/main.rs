//! `vegactl` — offline snapshot generation and catalog diagnostics.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vega_core::{CacheGateway, CatalogConfig, CatalogStore, Ingestor};

#[derive(Debug, Parser)]
#[command(name = "vegactl", about = "Vega movie-catalog tooling", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full ingest pipeline and write the static snapshot.
    ///
    /// Requires TMDB_API_KEY; this is the one path where a missing
    /// credential is fatal.
    Generate {
        /// Output path for the snapshot JSON.
        #[arg(long, default_value = "movies.json")]
        out: PathBuf,
    },
    /// Load the catalog (snapshot, cache, or live) and print a summary.
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { out } => generate(out).await,
        Command::Fetch => fetch().await,
    }
}

async fn generate(out: PathBuf) -> anyhow::Result<()> {
    let mut config = CatalogConfig::from_env();
    config
        .require_api_key()
        .context("the snapshot generator cannot run without a TMDB credential")?;
    // The snapshot is shared by every visitor; keep it free of the
    // per-session cosmetic platform labels.
    config.decorate_platforms = false;

    let now = Utc::now();
    let ingestor = Ingestor::new(config);
    let movies = ingestor.run(now.date_naive()).await;
    if movies.is_empty() {
        bail!("ingest produced no movies; refusing to overwrite the snapshot");
    }

    vega_core::snapshot::write_snapshot(&out, &movies)
        .with_context(|| format!("failed to write snapshot to {}", out.display()))?;

    info!(count = movies.len(), path = %out.display(), "snapshot written");
    Ok(())
}

async fn fetch() -> anyhow::Result<()> {
    let config = CatalogConfig::from_env();
    let cache = CacheGateway::new(config.cache_dir.clone());
    let ingestor = Ingestor::new(config);
    let mut store = CatalogStore::new();

    let source = ingestor.bootstrap(&mut store, &cache, Utc::now()).await;

    println!(
        "source: {source:?} | movies: {} | pages: {}",
        store.canonical().len(),
        store.total_pages()
    );
    for record in store.page_slice().iter().take(10) {
        println!("  {} ({}) [{}]", record.title, record.date, record.language);
    }
    Ok(())
}
