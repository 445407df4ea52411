// src/fetch/mod.rs

#[cfg(test)]
pub(crate) mod canned;
pub mod html_table;
pub mod pagination;

use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future, str::FromStr};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{
    error::{Result, UcpdError},
    table::RawTable,
};
pub use pagination::{PageCountItem, PageCountResolver};

/// Records per result page; page `i` starts at offset `i * PAGE_SIZE`.
pub const PAGE_SIZE: usize = 5;

static FIELD_INTERVIEWS_URL: &str =
    "https://incidentreports.uchicago.edu/fieldInterviewsArchive.php";
static TRAFFIC_STOPS_URL: &str = "https://incidentreports.uchicago.edu/trafficStopsArchive.php";

/// The two record categories the archive publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    FieldInterview,
    Traffic,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::FieldInterview => "Field Interview",
            DataType::Traffic => "Traffic",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            DataType::FieldInterview => FIELD_INTERVIEWS_URL,
            DataType::Traffic => TRAFFIC_STOPS_URL,
        }
    }

    /// Base name of the CSV files written for this category.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DataType::FieldInterview => "field_interview_df",
            DataType::Traffic => "traffic_df",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UcpdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "field interview" => Ok(DataType::FieldInterview),
            "traffic" => Ok(DataType::Traffic),
            _ => Err(UcpdError::UnsupportedDataType(s.to_string())),
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = UcpdError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DataType> for String {
    fn from(d: DataType) -> Self {
        d.as_str().to_string()
    }
}

/// One paginated archive query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub data_type: DataType,
    pub start_date: NaiveDate,
    /// `None` means today.
    pub end_date: Option<NaiveDate>,
    /// `None` means read the page count from the first response.
    pub max_page: Option<usize>,
}

impl Query {
    /// Endpoint with `startDate`/`endDate` as form-encoded `MM/DD/YYYY`.
    pub fn base_url(&self) -> Result<Url> {
        let end = self
            .end_date
            .unwrap_or_else(|| Local::now().date_naive());
        let mut url = Url::parse(self.data_type.endpoint())?;
        url.query_pairs_mut()
            .append_pair("startDate", &archive_date(self.start_date))
            .append_pair("endDate", &archive_date(end));
        Ok(url)
    }
}

fn archive_date(d: NaiveDate) -> String {
    d.format("%m/%d/%Y").to_string()
}

/// `base` with the record offset of zero-based `page` appended.
pub fn page_url(base: &Url, page: usize) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("offset", &(page * PAGE_SIZE).to_string());
    url
}

/// Something that can GET a page body.
pub trait PageSource {
    fn get_text(&self, url: &Url) -> impl Future<Output = Result<String>>;
}

impl PageSource for Client {
    async fn get_text(&self, url: &Url) -> Result<String> {
        debug!("Fetching text from {}", url);
        let http = |source: reqwest::Error| UcpdError::Http {
            url: url.to_string(),
            source,
        };
        self.get(url.clone())
            .send()
            .await
            .map_err(http)?
            .error_for_status()
            .map_err(http)?
            .text()
            .await
            .map_err(http)
    }
}

/// Fetch every page of `query` in order and concatenate their first tables.
///
/// Pages are requested one at a time. Any HTTP failure, a missing page-count
/// indicator or a page without a table aborts the whole scrape.
#[instrument(level = "info", skip(source, resolver), fields(data_type = %query.data_type))]
pub async fn scrape<S, R>(source: &S, resolver: &R, query: &Query) -> Result<RawTable>
where
    S: PageSource,
    R: PageCountResolver + ?Sized,
{
    let base = query.base_url()?;

    let pages = match query.max_page {
        Some(n) => n,
        None => {
            let index = source.get_text(&base).await?;
            let n = resolver.page_count(&index)?;
            info!(pages = n, "discovered page count");
            n
        }
    };

    let mut table = RawTable::default();
    if pages == 0 {
        warn!(url = %base, "zero pages to fetch");
        return Ok(table);
    }

    for page in 0..pages {
        let url = page_url(&base, page);
        let html = source.get_text(&url).await?;
        let part = html_table::parse_first_table(&html).ok_or_else(|| UcpdError::MissingTable {
            url: url.to_string(),
        })?;
        info!(page = page + 1, of = pages, rows = part.len(), "fetched page");
        table.append(part);
    }

    info!(rows = table.len(), columns = table.headers.len(), "scrape complete");
    Ok(table)
}
