mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use console::Term;
use maps_scout::scrapers::{ChromeMapPage, MapsSession};
use maps_scout::writer;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("maps_scout={level}")))
        .with_writer(std::io::stderr)
        .init();

    let params = cli.search_params(&Term::stdout())?;
    let config = cli.scrape_config();
    let config_json = serde_json::to_string(&config)?;
    debug!(config = %config_json, "Effective configuration");

    let output_dir = PathBuf::from(&params.output_dir);
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    info!("🗺️  Maps Scout - {}", params.search_text());

    let search_text = params.search_text();
    let output = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let page = ChromeMapPage::launch(&config)?;
        MapsSession::new(page, config).run(&search_text)
    })
    .await
    .context("Scrape task panicked")??;

    let summary = writer::write_output(&output_dir, &output)?;
    info!("💾 Saved output to {}", output_dir.display());

    println!("Saved {} businesses to {}.", summary.businesses, params.output_dir);
    println!("Saved {} reviews to {}.", summary.reviews, params.output_dir);
    println!("Saved {} photos to {}.", summary.photos, params.output_dir);

    Ok(())
}
