// src/parse/locate.rs

//! Table locator.
//!
//! Finds a named table either at the top level of a parsed document or
//! inside a comment node (for pages whose markup was not unmasked, or
//! where only some tables are hidden). Absence is an ordinary outcome:
//! many pages legitimately lack optional tables.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{AppError, Result};

/// One located table, held as an owned sub-document.
///
/// Re-parsing the table element decouples the handle from the lifetime of
/// the page document and from whichever comment the table was buried in.
pub struct TableHandle {
    id: String,
    doc: Html,
}

/// A header cell: visible label plus optional machine-readable key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub data_key: Option<String>,
}

impl TableHandle {
    fn from_element(id: &str, element: ElementRef<'_>) -> Self {
        Self {
            id: id.to_string(),
            doc: Html::parse_document(&element.html()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header cells of the last header row.
    ///
    /// Tables may stack multiple header rows; only the bottom one carries
    /// per-column leaf labels. Tables without a `thead` fall back to their
    /// first row.
    pub fn header_cells(&self) -> Result<Vec<HeaderCell>> {
        let head_rows = parse_selector("thead tr")?;
        let any_row = parse_selector("tr")?;

        let header_row = self
            .doc
            .select(&head_rows)
            .last()
            .or_else(|| self.doc.select(&any_row).next());

        let Some(row) = header_row else {
            return Ok(Vec::new());
        };

        Ok(row_cells(&row)
            .into_iter()
            .map(|cell| HeaderCell {
                label: cell_text(&cell),
                data_key: cell
                    .value()
                    .attr("data-stat")
                    .map(|key| key.to_string()),
            })
            .collect())
    }

    /// All body rows, in document order, unfiltered.
    pub fn body_rows(&self) -> Result<Vec<ElementRef<'_>>> {
        let body_rows = parse_selector("tbody tr")?;
        Ok(self.doc.select(&body_rows).collect())
    }
}

/// Find a table by its markup id, searching the top level first and then
/// inside comment nodes. Returns `None` when the page has no such table.
pub fn find_table(doc: &Html, table_id: &str) -> Result<Option<TableHandle>> {
    let table_selector = parse_selector(&format!("table#{table_id}"))?;

    if let Some(element) = doc.select(&table_selector).next() {
        return Ok(Some(TableHandle::from_element(table_id, element)));
    }

    // Structural fingerprint of the wanted table inside a comment body.
    let fingerprint = format!("id=\"{table_id}\"");
    for node in doc.tree.nodes() {
        if let Node::Comment(comment) = node.value() {
            let text: &str = &comment.comment;
            if !text.contains(&fingerprint) {
                continue;
            }
            let sub_doc = Html::parse_document(text);
            if let Some(element) = sub_doc.select(&table_selector).next() {
                return Ok(Some(TableHandle::from_element(table_id, element)));
            }
        }
    }

    Ok(None)
}

/// Parse a CSS selector, mapping failures into the application error type.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))
}

/// Direct `th`/`td` children of a row, in order.
pub fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            let name = el.value().name();
            name == "th" || name == "td"
        })
        .collect()
}

/// Collected, whitespace-trimmed text of an element.
pub fn cell_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
