use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use common::{MediaConfig, telemetry::init_tracing};
use playback::{Catalog, CatalogKind};
use tokio::io::AsyncWriteExt;
use tracing::{Level, info, warn};

mod probe;

use probe::Prober;

/// Resolve the media references of a catalog export
#[derive(Parser, Debug)]
#[command(name = "media")]
#[command(about = "Resolve catalog media references against the storage configuration")]
struct Cli {
    /// Path to a JSON catalog export (bare array or API response)
    catalog: PathBuf,

    /// Catalog kind: works or docs
    #[arg(short, long, default_value = "works")]
    kind: CatalogKind,

    /// Storage base URL (overrides MEDIA_STORAGE_BASE_URL)
    #[arg(long)]
    storage_base_url: Option<String>,

    /// Only print items whose default slot has nothing to play
    #[arg(long)]
    missing_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(Level::INFO);

    let cli = Cli::parse();

    let mut config = MediaConfig::from_env()?;
    if let Some(storage_base_url) = cli.storage_base_url {
        config.storage_base_url = storage_base_url.trim_end_matches('/').to_string();
    }

    info!(
        "Probing {:?} catalog at {}",
        cli.kind,
        cli.catalog.display()
    );

    let input = tokio::fs::read_to_string(&cli.catalog)
        .await
        .with_context(|| format!("Failed to read catalog {}", cli.catalog.display()))?;
    let catalog = Catalog::from_json(cli.kind, &input)?;

    let prober = Prober::from_config(&config);
    let records = prober.probe_catalog(&catalog);

    let mut stdout = tokio::io::stdout();
    let mut missing = 0;
    for record in &records {
        if !record.playable {
            missing += 1;
            warn!("Item {} ({}) has nothing to play", record.id, record.title);
        } else if cli.missing_only {
            continue;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
    }
    stdout.flush().await?;

    info!(
        "Probed {} items, {} without playable media",
        records.len(),
        missing
    );

    Ok(())
}
