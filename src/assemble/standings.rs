// src/assemble/standings.rs

//! Team standings assembler.
//!
//! Season standings come as two conference tables in modern markup and as
//! two division tables in older seasons. Division tables interleave
//! division-name header rows with team rows; those headers set the
//! division carried by the following teams instead of becoming records.

use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::{CellValue, TypedRecord};
use crate::parse::cells::{float_value, int_value};
use crate::parse::find_table;
use crate::parse::locate::{TableHandle, cell_text, row_cells};
use crate::parse::rows::{cell_by_stat, first_anchor_href, is_header_repeat};
use crate::utils::{ids, log};

/// Output column order for the standings dataset.
pub const STANDINGS_COLUMNS: &[&str] = &[
    "SeasonEndYear",
    "Conference",
    "Division",
    "Team",
    "Tm_ID",
    "Playoffs",
    "W",
    "L",
    "W/L%",
    "GB",
    "PS/G",
    "PA/G",
    "SRS",
];

/// Assemble standings records for one season page.
pub fn assemble_standings(doc: &Html, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let mut records = Vec::new();

    let east = find_table(doc, "confs_standings_E")?;
    let west = find_table(doc, "confs_standings_W")?;

    if let (Some(east), Some(west)) = (east, west) {
        conference_rows(&east, "East", season_end_year, &mut records)?;
        conference_rows(&west, "West", season_end_year, &mut records)?;
        return Ok(records);
    }

    for (table_id, conference) in [("divs_standings_E", "East"), ("divs_standings_W", "West")] {
        match find_table(doc, table_id)? {
            Some(table) => division_rows(&table, conference, season_end_year, &mut records)?,
            None => log::warn(&format!(
                "Standings table '{table_id}' not found for {season_end_year}"
            )),
        }
    }

    Ok(records)
}

fn conference_rows(
    table: &TableHandle,
    conference: &str,
    season_end_year: i32,
    out: &mut Vec<TypedRecord>,
) -> Result<()> {
    for row in table.body_rows()? {
        if is_header_repeat(&row) {
            continue;
        }
        if let Some(record) = team_row(&row, season_end_year, conference, None) {
            out.push(record);
        }
    }
    Ok(())
}

fn division_rows(
    table: &TableHandle,
    conference: &str,
    season_end_year: i32,
    out: &mut Vec<TypedRecord>,
) -> Result<()> {
    let mut current_division: Option<String> = None;
    for row in table.body_rows()? {
        if is_header_repeat(&row) {
            current_division = Some(cell_text(&row));
            continue;
        }
        if current_division.is_none() {
            continue;
        }
        if let Some(record) = team_row(
            &row,
            season_end_year,
            conference,
            current_division.as_deref(),
        ) {
            out.push(record);
        }
    }
    Ok(())
}

fn team_row(
    row: &ElementRef<'_>,
    season_end_year: i32,
    conference: &str,
    division: Option<&str>,
) -> Option<TypedRecord> {
    let name_cell = cell_by_stat(row, "team_name")?;
    let full_name = cell_text(&name_cell);
    if full_name.is_empty() {
        return None;
    }

    let mut record = TypedRecord::new();
    record.set("SeasonEndYear", i64::from(season_end_year));
    record.set("Conference", conference);
    record.set(
        "Division",
        division.map_or(CellValue::Null, CellValue::from),
    );
    record.set("Team", full_name.replace('*', "").trim().to_string());
    // The trailing asterisk marks a playoff berth.
    record.set("Playoffs", if full_name.contains('*') { "*" } else { "" });

    if let Some(abbr) = first_anchor_href(&name_cell)
        .as_deref()
        .and_then(ids::team_abbr_from_href)
    {
        record.set("Tm_ID", abbr);
    }

    for cell in row_cells(row) {
        if cell.value().name() != "td" {
            continue;
        }
        let Some(stat) = cell.value().attr("data-stat") else {
            continue;
        };
        let name = rename_stat(stat);
        record.set(name, standings_value(name, &cell_text(&cell)));
    }

    Some(record)
}

/// Presentational names for the published standings columns.
fn rename_stat(stat: &str) -> &str {
    match stat {
        "wins" => "W",
        "losses" => "L",
        "win_loss_pct" => "W/L%",
        "gb" => "GB",
        "pts_per_g" => "PS/G",
        "opp_pts_per_g" => "PA/G",
        "srs" => "SRS",
        other => other,
    }
}

fn standings_value(name: &str, text: &str) -> CellValue {
    match name {
        "W" | "L" => int_value(text),
        "W/L%" | "PS/G" | "PA/G" | "SRS" => float_value(text),
        // The leader's games-behind column is an em-dash, meaning zero.
        "GB" => match text {
            "" | "—" | "-" => CellValue::Float(0.0),
            other => float_value(other),
        },
        _ => CellValue::from_text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFERENCE_PAGE: &str = r#"
        <html><body>
        <table id="confs_standings_E">
        <thead><tr><th data-stat="team_name">Eastern Conference</th><th data-stat="wins">W</th></tr></thead>
        <tbody>
            <tr>
                <th data-stat="team_name"><a href="/teams/BOS/2024.html">Boston Celtics</a>*</th>
                <td data-stat="wins">64</td><td data-stat="losses">18</td>
                <td data-stat="win_loss_pct">.780</td><td data-stat="gb">—</td>
                <td data-stat="pts_per_g">120.6</td><td data-stat="opp_pts_per_g">109.2</td>
                <td data-stat="srs">11.29</td>
            </tr>
            <tr>
                <th data-stat="team_name"><a href="/teams/DET/2024.html">Detroit Pistons</a></th>
                <td data-stat="wins">14</td><td data-stat="losses">68</td>
                <td data-stat="win_loss_pct">.171</td><td data-stat="gb">50.0</td>
                <td data-stat="pts_per_g">109.9</td><td data-stat="opp_pts_per_g">119.0</td>
                <td data-stat="srs">-8.71</td>
            </tr>
        </tbody>
        </table>
        <table id="confs_standings_W">
        <thead><tr><th data-stat="team_name">Western Conference</th><th data-stat="wins">W</th></tr></thead>
        <tbody>
            <tr>
                <th data-stat="team_name"><a href="/teams/OKC/2024.html">Oklahoma City Thunder</a>*</th>
                <td data-stat="wins">57</td><td data-stat="losses">25</td>
                <td data-stat="win_loss_pct">.695</td><td data-stat="gb">—</td>
                <td data-stat="pts_per_g">120.1</td><td data-stat="opp_pts_per_g">112.7</td>
                <td data-stat="srs">7.07</td>
            </tr>
        </tbody>
        </table>
        </body></html>
    "#;

    const DIVISION_PAGE: &str = r#"
        <html><body>
        <table id="divs_standings_E">
        <tbody>
            <tr class="thead"><th colspan="8">Atlantic Division</th></tr>
            <tr>
                <th data-stat="team_name"><a href="/teams/PHI/2001.html">Philadelphia 76ers</a>*</th>
                <td data-stat="wins">56</td><td data-stat="losses">26</td>
                <td data-stat="win_loss_pct">.683</td><td data-stat="gb">—</td>
            </tr>
            <tr class="thead"><th colspan="8">Central Division</th></tr>
            <tr>
                <th data-stat="team_name"><a href="/teams/MIL/2001.html">Milwaukee Bucks</a>*</th>
                <td data-stat="wins">52</td><td data-stat="losses">30</td>
                <td data-stat="win_loss_pct">.634</td><td data-stat="gb">—</td>
            </tr>
        </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_conference_tables_combine_with_conference_tags() {
        let doc = Html::parse_document(CONFERENCE_PAGE);
        let records = assemble_standings(&doc, 2024).unwrap();
        assert_eq!(records.len(), 3);

        let conferences: Vec<_> = records
            .iter()
            .map(|r| r.get("Conference").unwrap().csv_field())
            .collect();
        assert_eq!(conferences, vec!["East", "East", "West"]);
        assert!(records.iter().all(|r| r.get("Division").unwrap().is_null()));
    }

    #[test]
    fn test_playoff_marker_and_value_coercion() {
        let doc = Html::parse_document(CONFERENCE_PAGE);
        let records = assemble_standings(&doc, 2024).unwrap();
        let boston = &records[0];

        assert_eq!(boston.get("Team"), Some(&CellValue::Str("Boston Celtics".into())));
        assert_eq!(boston.get("Tm_ID"), Some(&CellValue::Str("BOS".into())));
        assert_eq!(boston.get("Playoffs"), Some(&CellValue::Str("*".into())));
        assert_eq!(boston.get("W"), Some(&CellValue::Int(64)));
        assert_eq!(boston.get("W/L%"), Some(&CellValue::Float(0.78)));
        assert_eq!(boston.get("GB"), Some(&CellValue::Float(0.0)));
        assert_eq!(boston.get("SRS"), Some(&CellValue::Float(11.29)));

        let detroit = &records[1];
        assert_eq!(detroit.get("Playoffs"), Some(&CellValue::Str("".into())));
        assert_eq!(detroit.get("GB"), Some(&CellValue::Float(50.0)));
    }

    #[test]
    fn test_division_fallback_carries_division_names() {
        let doc = Html::parse_document(DIVISION_PAGE);
        let records = assemble_standings(&doc, 2001).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("Division"),
            Some(&CellValue::Str("Atlantic Division".into()))
        );
        assert_eq!(
            records[1].get("Division"),
            Some(&CellValue::Str("Central Division".into()))
        );
        assert!(records.iter().all(|r| {
            r.get("Conference") == Some(&CellValue::Str("East".into()))
        }));
    }

    #[test]
    fn test_page_without_standings_is_empty() {
        let doc = Html::parse_document("<html><body></body></html>");
        let records = assemble_standings(&doc, 1999).unwrap();
        assert!(records.is_empty());
    }
}
