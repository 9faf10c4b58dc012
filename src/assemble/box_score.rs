// src/assemble/box_score.rs

//! Box-score page assembler.
//!
//! One box-score page yields up to four tabular datasets (line score,
//! four factors, player basic and advanced stats per team) plus a small
//! game-meta record scraped from free-standing text blocks. Players who
//! did not take the floor are still emitted, with their absence reason
//! preserved and every statistical field explicitly null.

use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::{CellValue, TableKind, TypedRecord};
use crate::parse::cells::{float_value, int_value};
use crate::parse::locate::{cell_text, parse_selector, row_cells};
use crate::parse::rows::{
    absence_reason, data_rows, first_anchor_href, first_anchor_text, typed_record,
};
use crate::parse::{build_column_spec, find_table};
use crate::utils::{ids, log};

/// All records assembled from one box-score page.
#[derive(Debug, Default)]
pub struct BoxScoreBundle {
    pub line_scores: Vec<TypedRecord>,
    pub four_factors: Vec<TypedRecord>,
    pub player_basic: Vec<TypedRecord>,
    pub player_advanced: Vec<TypedRecord>,
    pub game_meta: TypedRecord,
}

/// Assemble every dataset a box-score page carries.
pub fn assemble_box_score(
    doc: &Html,
    game_id: &str,
    season_end_year: i32,
    home_team: Option<&str>,
    visitor_team: Option<&str>,
) -> Result<BoxScoreBundle> {
    let mut bundle = BoxScoreBundle {
        line_scores: line_score_records(doc, game_id)?,
        four_factors: four_factors_records(doc, game_id)?,
        ..BoxScoreBundle::default()
    };

    // Visitor first, matching the on-page table order.
    for (team, opponent) in [(visitor_team, home_team), (home_team, visitor_team)] {
        let Some(team) = team else { continue };
        for (kind, suffix) in [(TableKind::BoxBasic, "basic"), (TableKind::BoxAdvanced, "advanced")] {
            let records = player_records(doc, game_id, team, opponent, kind, suffix)?;
            match kind {
                TableKind::BoxBasic => bundle.player_basic.extend(records),
                _ => bundle.player_advanced.extend(records),
            }
        }
    }

    bundle.game_meta = game_meta_record(doc, game_id, season_end_year);
    Ok(bundle)
}

/// Per-quarter scoring lines, one record per team.
fn line_score_records(doc: &Html, game_id: &str) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "line_score")? else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let cells = row_cells(&row);
        if cells.is_empty() {
            continue;
        }
        let mut record = TypedRecord::new();
        record.set("Game_ID", game_id);
        record.set("Team_ID", team_label(&cells[0]));
        for (quarter, cell) in cells.iter().skip(1).take(4).enumerate() {
            record.set(format!("Q{}", quarter + 1), int_value(&cell_text(cell)));
        }
        // Overtime periods shift the total to the last cell.
        let final_pts = cells
            .last()
            .map_or(CellValue::Null, |cell| int_value(&cell_text(cell)));
        record.set("Final_PTS", final_pts);
        records.push(record);
    }
    Ok(records)
}

/// Four-factors efficiency summary, one record per team.
fn four_factors_records(doc: &Html, game_id: &str) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "four_factors")? else {
        return Ok(Vec::new());
    };

    const FIELDS: &[&str] = &["Pace", "eFG_Pct", "TOV_Pct", "ORB_Pct", "FT_per_FGA", "ORtg"];

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let cells = row_cells(&row);
        if cells.is_empty() {
            continue;
        }
        let mut record = TypedRecord::new();
        record.set("Game_ID", game_id);
        record.set("Team_ID", team_label(&cells[0]));
        for (index, field) in FIELDS.iter().enumerate() {
            let value = cells
                .get(index + 1)
                .map_or(CellValue::Null, |cell| float_value(&cell_text(cell)));
            record.set(*field, value);
        }
        records.push(record);
    }
    Ok(records)
}

/// One team's player table (basic or advanced).
fn player_records(
    doc: &Html,
    game_id: &str,
    team: &str,
    opponent: Option<&str>,
    kind: TableKind,
    suffix: &str,
) -> Result<Vec<TypedRecord>> {
    let table_id = format!("box-{team}-game-{suffix}");
    let Some(table) = find_table(doc, &table_id)? else {
        log::warn(&format!("Could not find player table {table_id}"));
        return Ok(Vec::new());
    };

    let spec = build_column_spec(&table, kind)?;
    let mut records = Vec::new();

    for row in data_rows(&table)? {
        let cells = row_cells(&row);
        if cells.is_empty() {
            continue;
        }

        let mut record = TypedRecord::new();
        record.set("Game_ID", game_id);
        record.set("Team_ID", team);
        record.set(
            "Opponent_Team_ID",
            opponent.map_or(CellValue::Null, CellValue::from),
        );

        let player_cell = &cells[0];
        let player_name =
            first_anchor_text(player_cell).unwrap_or_else(|| cell_text(player_cell));
        record.set("Player_Name_Full", player_name);
        if let Some(player_id) = first_anchor_href(player_cell)
            .as_deref()
            .and_then(ids::player_id_from_href)
        {
            record.set("Player_ID", player_id);
        }

        if let Some(reason) = absence_reason(&cells) {
            record.set("Played_Status", reason);
            record.set("MP", "0:00");
            for column in spec.columns.iter().skip(1) {
                if !record.contains(&column.name) {
                    record.set(column.name.clone(), CellValue::Null);
                }
            }
        } else {
            record.set("Played_Status", "Played");
            let stats = typed_record(&row, &spec);
            for (name, value) in stats.iter() {
                if name != "Player_Name_Full" {
                    record.set(name, value.clone());
                }
            }
        }

        records.push(record);
    }
    Ok(records)
}

/// Officials, inactive players and game duration, scraped from the text
/// blocks below the tables.
fn game_meta_record(doc: &Html, game_id: &str, season_end_year: i32) -> TypedRecord {
    let mut record = TypedRecord::new();
    record.set("Game_ID", game_id);
    record.set("Season_End_Year", i64::from(season_end_year));

    if let Some(text) = marker_div_text(doc, "Inactive:") {
        record.set("Inactives_Text", text);
    }
    if let Some(text) = marker_div_text(doc, "Officials:") {
        record.set(
            "Officials_Text",
            text.replace("Officials:", "").trim().to_string(),
        );
    }
    if let Some(text) = marker_div_text(doc, "Time of Game:") {
        record.set(
            "Time_Of_Game_Str",
            text.replace("Time of Game:", "").trim().to_string(),
        );
    }
    record
}

/// Text of the innermost div containing the marker.
fn marker_div_text(doc: &Html, marker: &str) -> Option<String> {
    let divs = parse_selector("div").ok()?;
    doc.select(&divs)
        .filter_map(|div| {
            let text = div
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            text.contains(marker).then_some(text)
        })
        .min_by_key(|text| text.len())
}

/// Team abbreviation from a leading cell: its link when present, the raw
/// cell text otherwise.
fn team_label(cell: &ElementRef<'_>) -> String {
    first_anchor_href(cell)
        .as_deref()
        .and_then(ids::team_abbr_from_href)
        .unwrap_or_else(|| cell_text(cell))
}
