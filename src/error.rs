// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = UcpdError> = std::result::Result<T, E>;

/// Everything the fetcher and normalizer can fail with.
#[derive(Debug, Error)]
pub enum UcpdError {
    /// Connection failure or non-2xx status.
    #[error("GET {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported data type {0:?} (expected \"Field Interview\" or \"Traffic\")")]
    UnsupportedDataType(String),

    #[error("no page-count indicator matching `{selector}`")]
    MissingPageCount { selector: String },

    #[error("page-count indicator {text:?} does not end in a page number")]
    BadPageCount { text: String },

    #[error("no table found in {url}")]
    MissingTable { url: String },

    #[error("missing column {0:?}")]
    MissingColumn(String),

    /// A Date/Time value that cannot be split into a date and a time.
    #[error("row {row}: Date/Time value {value:?} has no date/time separator")]
    MalformedDateTime { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl UcpdError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UcpdError::Io {
            path: path.into(),
            source,
        }
    }
}
