// src/bin/clean.rs

use anyhow::{Context, Result};
use tracing::info;
use ucpd_scraper::{logging, pipeline, Config};

fn main() -> Result<()> {
    logging::init();
    let cfg = Config::load().context("loading config")?;
    info!(data_dir = %cfg.data_dir.display(), "clean startup");

    pipeline::clean_all(&cfg).context("cleaning raw tables")?;

    info!("all done");
    Ok(())
}
