// src/fetch/html_table.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::table::RawTable;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("selector should parse"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("selector should parse"));

/// Upper bound on a single cell's `colspan`.
const MAX_COLSPAN: usize = 64;

/// Parse the first `<table>` of `html` into a RawTable, or `None` if the
/// document has no table.
///
/// - The header is the first row inside `<thead>` or made only of `<th>`
///   cells; without one, columns are named `0`, `1`, ...
/// - Cell text is trimmed with inner whitespace runs collapsed to one space.
/// - A cell with `colspan=N` fills N columns with its text.
/// - Body rows are padded or truncated to the header width.
pub fn parse_first_table(html: &str) -> Option<RawTable> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE).next()?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    // Descendant match: rows of a nested table are taken as rows of this one.
    for tr in table.select(&ROW) {
        let mut all_th = true;
        let mut cells = Vec::new();
        for cell in tr.select(&CELL) {
            all_th &= cell.value().name() == "th";
            let text = cell_text(cell);
            let span = cell
                .value()
                .attr("colspan")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, MAX_COLSPAN);
            cells.extend(std::iter::repeat(text).take(span));
        }
        if cells.is_empty() {
            continue;
        }

        if all_th || in_thead(tr) {
            if headers.is_none() && rows.is_empty() {
                headers = Some(cells);
            } else {
                trace!(?cells, "skipping repeated header row");
            }
            continue;
        }
        rows.push(cells);
    }

    let headers = headers.unwrap_or_else(|| {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..width).map(|i| i.to_string()).collect()
    });
    let width = headers.len();
    for row in &mut rows {
        row.resize(width, String::new());
    }

    Some(RawTable { headers, rows })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn in_thead(tr: ElementRef<'_>) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "table")
        .any(|el| el.value().name() == "thead")
}
