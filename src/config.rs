// src/config.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    error::{Result, UcpdError},
    fetch::{DataType, Query},
};

/// Env var naming a YAML config file to load instead of `ucpd.yaml`.
pub const CONFIG_ENV: &str = "UCPD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ucpd.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding raw and cleaned CSVs.
    pub data_dir: PathBuf,
    pub scrape: ScrapeConfig,
    pub clean: CleanConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub start_date: NaiveDate,
    /// `None` queries up to today.
    pub end_date: Option<NaiveDate>,
    /// `None` reads the page count off the first response.
    pub max_page: Option<usize>,
    pub data_types: Vec<DataType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Case-sensitive substrings marking "no results" rows in Date/Time.
    pub placeholder_patterns: Vec<String>,
    /// Drop rows whose standardized Race is "MALE" or "FEMALE".
    pub drop_gender_in_race: bool,
    /// Skip (and log) rows whose Date/Time cannot be split instead of failing.
    pub skip_malformed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            scrape: ScrapeConfig::default(),
            clean: CleanConfig::default(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap_or_default(),
            end_date: None,
            max_page: None,
            data_types: vec![DataType::FieldInterview, DataType::Traffic],
        }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            placeholder_patterns: ["traffic stops", "field interviews", "no", "No"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            drop_gender_in_race: false,
            skip_malformed: false,
        }
    }
}

impl ScrapeConfig {
    pub fn query(&self, data_type: DataType) -> Query {
        Query {
            data_type,
            start_date: self.start_date,
            end_date: self.end_date,
            max_page: self.max_page,
        }
    }
}

impl Config {
    /// `$UCPD_CONFIG` if set, else `./ucpd.yaml` if present, else defaults.
    pub fn load() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => {
                info!("no config file; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| UcpdError::io(path, e))?;
        let cfg = Self::from_yaml(&text).map_err(|source| UcpdError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn raw_path(&self, data_type: DataType) -> PathBuf {
        self.data_dir.join(format!("{}.csv", data_type.file_stem()))
    }

    pub fn cleaned_path(&self, data_type: DataType) -> PathBuf {
        self.data_dir
            .join(format!("{}_cleaned.csv", data_type.file_stem()))
    }
}
