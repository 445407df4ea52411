// src/pipeline.rs

use tracing::{info, instrument};

use crate::{
    clean::clean_table,
    config::Config,
    error::Result,
    fetch::{scrape, PageCountItem, PageSource},
    table::RawTable,
};

/// Scrape every configured category, then write one raw CSV per category.
///
/// Nothing is written unless every category scraped successfully.
#[instrument(level = "info", skip_all)]
pub async fn scrape_all<S: PageSource>(source: &S, cfg: &Config) -> Result<()> {
    let resolver = PageCountItem::default();
    let mut scraped = Vec::with_capacity(cfg.scrape.data_types.len());
    for &data_type in &cfg.scrape.data_types {
        let table = scrape(source, &resolver, &cfg.scrape.query(data_type)).await?;
        scraped.push((data_type, table));
    }

    for (data_type, table) in scraped {
        table.write_csv(cfg.raw_path(data_type))?;
    }
    Ok(())
}

/// Clean the raw CSV of every configured category into its `_cleaned` CSV.
///
/// Nothing is written unless every category cleaned successfully.
#[instrument(level = "info", skip_all)]
pub fn clean_all(cfg: &Config) -> Result<()> {
    let mut cleaned = Vec::with_capacity(cfg.scrape.data_types.len());
    for &data_type in &cfg.scrape.data_types {
        let path = cfg.raw_path(data_type);
        info!(%data_type, path = %path.display(), "cleaning");
        let raw = RawTable::read_csv(&path)?;
        let (table, _stats) = clean_table(&raw, &cfg.clean)?;
        cleaned.push((data_type, table));
    }

    for (data_type, table) in cleaned {
        table.write_csv(cfg.cleaned_path(data_type))?;
    }
    Ok(())
}
