// src/table.rs

use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::{Result, UcpdError};

/// A scraped or cleaned table: column names plus rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, as published by the source (or as written by the normalizer).
    pub headers: Vec<String>,
    /// Each row, one String per header. Missing cells are empty strings.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| UcpdError::MissingColumn(name.to_string()))
    }

    /// Concatenate `other` below `self`, aligning cells by column name.
    ///
    /// Columns unknown to `self` are appended in the order `other` lists them;
    /// cells a row has no value for are left empty.
    pub fn append(&mut self, other: RawTable) {
        if self.headers.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }
        if self.headers == other.headers {
            self.rows.extend(other.rows);
            return;
        }

        let mapping: Vec<usize> = other
            .headers
            .iter()
            .map(|h| match self.column_index(h) {
                Some(i) => i,
                None => {
                    debug!(column = %h, "new column while appending");
                    self.headers.push(h.clone());
                    self.headers.len() - 1
                }
            })
            .collect();

        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (cell, &dst) in row.into_iter().zip(&mapping) {
                aligned[dst] = cell;
            }
            self.rows.push(aligned);
        }
    }

    /// Read a headed CSV file. Short records are padded to the header width.
    /// A zero-byte file reads as an empty table with no columns.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| UcpdError::io(path, e))?;
        let size = file.metadata().map_err(|e| UcpdError::io(path, e))?.len();
        if size == 0 {
            debug!(path = %path.display(), "empty CSV");
            return Ok(RawTable::default());
        }
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();
        let mut table = RawTable::new(headers);
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            table.rows.push(row);
        }

        debug!(path = %path.display(), rows = table.len(), "read CSV");
        Ok(table)
    }

    /// Write the table as CSV, replacing any existing file at `path`.
    ///
    /// Rows go to a hidden sibling first and are renamed over the target once
    /// complete, so a failed write leaves no partial output.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| UcpdError::io(parent, e))?;
        }

        let tmp_path = tmp_sibling(path);
        {
            let mut wtr = WriterBuilder::new().from_path(&tmp_path)?;
            // A header-less table is written as a zero-byte file.
            if !self.headers.is_empty() {
                wtr.write_record(&self.headers)?;
            }
            for row in &self.rows {
                wtr.write_record(row)?;
            }
            wtr.flush().map_err(|e| UcpdError::io(&tmp_path, e))?;
        }

        fs::rename(&tmp_path, path).map_err(|e| UcpdError::io(path, e))?;
        info!(path = %path.display(), rows = self.len(), "wrote CSV");
        Ok(())
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "table.csv".into());
    path.with_file_name(format!(".{}.tmp", name))
}
