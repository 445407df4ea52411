// src/fetch/canned.rs

use std::{cell::RefCell, collections::HashMap};
use url::Url;

use super::PageSource;
use crate::error::{Result, UcpdError};

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub(crate) struct CannedPages {
    pub(crate) pages: HashMap<String, String>,
    pub(crate) requested: RefCell<Vec<String>>,
}

impl CannedPages {
    pub(crate) fn with(mut self, url: &Url, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

impl PageSource for CannedPages {
    async fn get_text(&self, url: &Url) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| UcpdError::MissingTable {
                url: format!("no canned page for {}", url),
            })
    }
}
