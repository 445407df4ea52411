// src/bin/scrape.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;
use ucpd_scraper::{logging, pipeline, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cfg = Config::load().context("loading config")?;
    info!(data_dir = %cfg.data_dir.display(), "scrape startup");

    let client = Client::new();
    pipeline::scrape_all(&client, &cfg)
        .await
        .context("scraping incident archive")?;

    info!("all done");
    Ok(())
}
