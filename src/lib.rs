// src/lib.rs

pub mod clean;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod table;

pub use clean::{clean_table, standardize_race, CleanStats};
pub use config::{CleanConfig, Config, ScrapeConfig};
pub use error::{Result, UcpdError};
pub use fetch::{scrape, DataType, Query};
pub use table::RawTable;
