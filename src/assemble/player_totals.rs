// src/assemble/player_totals.rs

//! League-wide player season totals assembler.
//!
//! The season totals page keys every cell with a machine-readable stat
//! name, so extraction is key-driven and the published column names are
//! applied afterwards through a fixed rename table.

use scraper::Html;

use crate::error::Result;
use crate::models::{CellValue, TypedRecord};
use crate::parse::cells::{float_value, int_value};
use crate::parse::find_table;
use crate::parse::locate::{cell_text, row_cells};
use crate::parse::rows::{data_rows, first_anchor_href};
use crate::utils::{ids, log};

/// Source key to published column name, in output order.
const RENAMES: &[(&str, &str)] = &[
    ("ranker", "Rk"),
    ("name_display", "Player"),
    ("player_id", "PlayerID"),
    ("player_id_csv", "PlayerID_CSV"),
    ("age", "Age"),
    ("team_name_abbr", "Tm"),
    ("pos", "Pos"),
    ("games", "G"),
    ("games_started", "GS"),
    ("mp", "MP"),
    ("fg", "FG"),
    ("fga", "FGA"),
    ("fg_pct", "FG%"),
    ("fg3", "3P"),
    ("fg3a", "3PA"),
    ("fg3_pct", "3P%"),
    ("fg2", "2P"),
    ("fg2a", "2PA"),
    ("fg2_pct", "2P%"),
    ("efg_pct", "eFG%"),
    ("ft", "FT"),
    ("fta", "FTA"),
    ("ft_pct", "FT%"),
    ("orb", "ORB"),
    ("drb", "DRB"),
    ("trb", "TRB"),
    ("ast", "AST"),
    ("stl", "STL"),
    ("blk", "BLK"),
    ("tov", "TOV"),
    ("pf", "PF"),
    ("pts", "PTS"),
    ("tpl_dbl", "Trp-Dbl"),
    ("awards", "Awards"),
];

const INT_COLS: &[&str] = &[
    "Rk", "Age", "G", "GS", "MP", "FG", "FGA", "3P", "3PA", "2P", "2PA", "FT", "FTA", "ORB",
    "DRB", "TRB", "AST", "STL", "BLK", "TOV", "PF", "PTS",
];

const FLOAT_COLS: &[&str] = &["FG%", "3P%", "2P%", "eFG%", "FT%"];

/// Published column order for the league totals dataset.
pub fn league_totals_columns() -> Vec<&'static str> {
    let mut columns = vec!["SeasonEndYear"];
    columns.extend(RENAMES.iter().map(|(_, published)| *published));
    columns
}

/// Assemble league totals records for one season page.
pub fn assemble_league_totals(doc: &Html, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "totals_stats")? else {
        log::warn(&format!(
            "Stats table 'totals_stats' not found for year {season_end_year}"
        ));
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let mut raw: Vec<(String, String)> = Vec::new();
        let mut player_id = None;
        let mut player_id_csv = None;
        let mut has_player = false;

        for cell in row_cells(&row) {
            let Some(stat) = cell.value().attr("data-stat") else {
                continue;
            };
            let text = cell_text(&cell);
            if stat == "name_display" {
                has_player = !text.is_empty();
                player_id = first_anchor_href(&cell)
                    .as_deref()
                    .and_then(ids::player_id_from_href);
                player_id_csv = cell
                    .value()
                    .attr("data-append-csv")
                    .map(|value| value.to_string());
            }
            raw.push((stat.to_string(), text));
        }

        if !has_player {
            continue;
        }

        let mut record = TypedRecord::new();
        record.set("SeasonEndYear", i64::from(season_end_year));
        for (source, published) in RENAMES {
            let text = match *source {
                "player_id" => player_id.clone(),
                "player_id_csv" => player_id_csv.clone(),
                _ => raw
                    .iter()
                    .find(|(stat, _)| stat == source)
                    .map(|(_, text)| text.clone()),
            };
            let Some(text) = text else { continue };
            record.set(*published, totals_value(published, &text));
        }
        records.push(record);
    }
    Ok(records)
}

fn totals_value(published: &str, text: &str) -> CellValue {
    // A blank triple-double count means zero, not unknown.
    if published == "Trp-Dbl" {
        return int_value(if text.is_empty() { "0" } else { text });
    }
    if text.is_empty() {
        return CellValue::Null;
    }
    if INT_COLS.contains(&published) {
        return int_value(text);
    }
    if FLOAT_COLS.contains(&published) {
        return float_value(text);
    }
    CellValue::Str(text.to_string())
}
