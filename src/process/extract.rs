// src/process/extract.rs

use crate::error::{DashboardError, Result};
use crate::process::raw_table::{RawRow, RawTable};
use crate::process::schema::MIN_CELLS;
use crate::process::utils::cell_text;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("selector should parse"));
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").expect("selector should parse"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("selector should parse"));

/// Locate `<table id="{table_id}">`, take its first `<tbody>`, and return the
/// trimmed `<td>` text of every row after the first (header) row.
///
/// A missing table or body, or any row too short to map onto the column
/// schema, is a `Parse` error.
#[instrument(level = "debug", skip(html), fields(bytes = html.len()))]
pub fn extract_table(html: &str, table_id: &str) -> Result<RawTable> {
    let doc = Html::parse_document(html);

    let table = doc
        .select(&TABLE)
        .find(|t| t.value().id() == Some(table_id))
        .ok_or_else(|| DashboardError::Parse(format!("no <table id=\"{}\"> in page", table_id)))?;

    let tbody = table
        .select(&TBODY)
        .next()
        .ok_or_else(|| DashboardError::Parse(format!("table {} has no <tbody>", table_id)))?;

    let mut rows = tbody
        .select(&TR)
        .map(|tr| tr.select(&TD).map(cell_text).collect::<RawRow>());

    if rows.next().is_none() {
        debug!(table_id, "table body is empty");
    }

    let rows = rows.collect::<Vec<_>>();
    for (i, row) in rows.iter().enumerate() {
        if row.len() < MIN_CELLS {
            return Err(DashboardError::Parse(format!(
                "body row {} has {} cells, expected at least {}",
                i + 1,
                row.len(),
                MIN_CELLS
            )));
        }
    }

    debug!(rows = rows.len(), "extracted table rows");
    Ok(RawTable {
        table_id: table_id.to_string(),
        rows,
    })
}
