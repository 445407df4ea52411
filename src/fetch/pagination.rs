// src/fetch/pagination.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::trace;

use crate::error::{Result, UcpdError};

const PAGE_COUNT_CSS: &str = "li.page-count";

static PAGE_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(PAGE_COUNT_CSS).expect("page-count selector should parse"));

/// Reads the total number of result pages off an index page.
pub trait PageCountResolver {
    fn page_count(&self, html: &str) -> Result<usize>;
}

/// Finds the first element matching a selector (by default `li.page-count`)
/// and takes the last whitespace-separated token of its text, e.g.
/// `"Page 1 of 12"` → 12.
#[derive(Debug, Clone)]
pub struct PageCountItem {
    css: String,
    selector: Selector,
}

impl Default for PageCountItem {
    fn default() -> Self {
        Self {
            css: PAGE_COUNT_CSS.to_string(),
            selector: PAGE_COUNT.clone(),
        }
    }
}

impl PageCountItem {
    /// `None` if `css` is not a valid selector.
    pub fn with_selector(css: &str) -> Option<Self> {
        let selector = Selector::parse(css).ok()?;
        Some(Self {
            css: css.to_string(),
            selector,
        })
    }
}

impl PageCountResolver for PageCountItem {
    fn page_count(&self, html: &str) -> Result<usize> {
        let doc = Html::parse_document(html);
        let item = doc
            .select(&self.selector)
            .next()
            .ok_or_else(|| UcpdError::MissingPageCount {
                selector: self.css.clone(),
            })?;

        let text = item.text().collect::<String>();
        trace!(text = %text.trim(), "page-count indicator");
        text.split_whitespace()
            .last()
            .and_then(|tok| tok.parse::<usize>().ok())
            .ok_or_else(|| UcpdError::BadPageCount {
                text: text.trim().to_string(),
            })
    }
}
