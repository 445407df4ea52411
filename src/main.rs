// src/main.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;
use ucpd_scraper::{logging, pipeline, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let cfg = Config::load().context("loading config")?;
    let client = Client::new();

    // ─── 3) scrape raw tables ────────────────────────────────────────
    info!(data_dir = %cfg.data_dir.display(), "scraping");
    pipeline::scrape_all(&client, &cfg)
        .await
        .context("scraping incident archive")?;

    // ─── 4) clean raw tables ─────────────────────────────────────────
    pipeline::clean_all(&cfg).context("cleaning raw tables")?;

    info!("all done");
    Ok(())
}
