// src/parse/rows.rs

//! Row extractor.
//!
//! Walks table body rows, drops non-data rows (section headers, repeated
//! header rows), and coerces each cell into a typed value aligned to the
//! table's ColumnSpec.

use scraper::ElementRef;

use crate::error::Result;
use crate::models::TypedRecord;

use super::cells::coerce;
use super::headers::ColumnSpec;
use super::locate::{self, TableHandle, cell_text, row_cells};

/// Reasons a rostered player can appear in a box score without stats.
pub const ABSENCE_REASONS: &[&str] = &[
    "Did Not Play",
    "Not With Team",
    "Player Suspended",
    "Did Not Dress",
];

/// True for rows that repeat or subdivide the header instead of carrying
/// data: `thead`-classed repeats and `over_header` section rows.
pub fn is_header_repeat(row: &ElementRef<'_>) -> bool {
    let classed_thead = row
        .value()
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == "thead"));
    if classed_thead {
        return true;
    }
    row_cells(row).iter().any(|cell| {
        cell.value()
            .attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == "over_header"))
    })
}

/// Body rows that carry data, in document order.
pub fn data_rows<'a>(table: &'a TableHandle) -> Result<Vec<ElementRef<'a>>> {
    Ok(table
        .body_rows()?
        .into_iter()
        .filter(|row| !is_header_repeat(row))
        .collect())
}

/// Coerce one row's cells into a record, index-aligned to the ColumnSpec.
///
/// Cells beyond the known columns get positional fallback names so no
/// value is silently dropped.
pub fn typed_record(row: &ElementRef<'_>, spec: &ColumnSpec) -> TypedRecord {
    let mut record = TypedRecord::new();
    for (index, cell) in row_cells(row).iter().enumerate() {
        let fallback;
        let name = match spec.name(index) {
            Some(name) => name,
            None => {
                fallback = format!("column_{index}_fallback");
                &fallback
            }
        };
        record.set(name, coerce(name, &cell_text(cell)));
    }
    record
}

/// The absence reason for a box-score row, when its minutes cell carries
/// one instead of a stat line.
pub fn absence_reason(cells: &[ElementRef<'_>]) -> Option<String> {
    let text = cell_text(cells.get(1)?);
    ABSENCE_REASONS
        .iter()
        .any(|reason| text.contains(reason))
        .then_some(text)
}

/// First cell of a row whose `data-stat` key matches.
pub fn cell_by_stat<'a>(row: &ElementRef<'a>, stat: &str) -> Option<ElementRef<'a>> {
    row_cells(row)
        .into_iter()
        .find(|cell| cell.value().attr("data-stat") == Some(stat))
}

/// First anchor href within an element.
pub fn first_anchor_href(element: &ElementRef<'_>) -> Option<String> {
    let anchor = locate::parse_selector("a").ok()?;
    element
        .select(&anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}

/// Text of the first anchor within an element.
pub fn first_anchor_text(element: &ElementRef<'_>) -> Option<String> {
    let anchor = locate::parse_selector("a").ok()?;
    element.select(&anchor).next().map(|a| cell_text(&a))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::models::{CellValue, TableKind};
    use crate::parse::headers::build_column_spec;
    use crate::parse::locate::find_table;

    const TABLE: &str = r#"
        <table id="per_game_stats">
        <thead>
            <tr><th data-stat="player">Player</th><th data-stat="g">G</th><th data-stat="pts_per_g">PTS</th></tr>
        </thead>
        <tbody>
            <tr class="thead"><td colspan="3">Repeat</td></tr>
            <tr><th class="over_header">Section</th><td></td><td></td></tr>
            <tr><td data-stat="player"><a href="/players/t/tatumja01.html">Jayson Tatum</a></td><td data-stat="g">74</td><td data-stat="pts_per_g">26.9</td></tr>
        </tbody>
        </table>
    "#;

    fn handle() -> TableHandle {
        let doc = Html::parse_document(TABLE);
        find_table(&doc, "per_game_stats").unwrap().unwrap()
    }

    #[test]
    fn test_skips_header_repeat_and_section_rows() {
        let table = handle();
        let rows = data_rows(&table).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_typed_record_alignment_and_coercion() {
        let table = handle();
        let spec = build_column_spec(&table, TableKind::PerGame).unwrap();
        let rows = data_rows(&table).unwrap();
        let record = typed_record(&rows[0], &spec);

        assert_eq!(
            record.get("Player_Name_Stats"),
            Some(&CellValue::Str("Jayson Tatum".to_string()))
        );
        assert_eq!(record.get("G"), Some(&CellValue::Int(74)));
        assert_eq!(record.get("PTS"), Some(&CellValue::Float(26.9)));
    }

    #[test]
    fn test_anchor_helpers() {
        let table = handle();
        let rows = data_rows(&table).unwrap();
        let player_cell = cell_by_stat(&rows[0], "player").unwrap();
        assert_eq!(
            first_anchor_href(&player_cell).as_deref(),
            Some("/players/t/tatumja01.html")
        );
        assert_eq!(
            first_anchor_text(&player_cell).as_deref(),
            Some("Jayson Tatum")
        );
    }

    #[test]
    fn test_absence_reason() {
        let html = r#"
            <table id="box-BOS-game-basic"><tbody>
            <tr>
                <td data-stat="player">Reserve Player</td>
                <td data-stat="reason" colspan="19">Did Not Play</td>
            </tr>
            </tbody></table>
        "#;
        let doc = Html::parse_document(html);
        let table = find_table(&doc, "box-BOS-game-basic").unwrap().unwrap();
        let rows = table.body_rows().unwrap();
        let cells = row_cells(&rows[0]);
        assert_eq!(absence_reason(&cells).as_deref(), Some("Did Not Play"));
    }
}
