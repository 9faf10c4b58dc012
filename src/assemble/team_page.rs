// src/assemble/team_page.rs

//! Per-team season page assembler.
//!
//! One team page carries six tables of interest: roster, team/opponent
//! splits, team misc, player per-game stats, player season totals and
//! salaries. Several of them hide inside comment blocks, which the table
//! locator resolves transparently. Every record is stamped with the team
//! abbreviation and season-end year join keys.

use scraper::Html;

use crate::error::Result;
use crate::models::{CellValue, TableKind, TypedRecord};
use crate::parse::locate::{cell_text, row_cells};
use crate::parse::rows::{cell_by_stat, data_rows, first_anchor_href, typed_record};
use crate::parse::{build_column_spec, find_table};
use crate::utils::ids;

/// All records assembled from one team season page.
#[derive(Debug, Default)]
pub struct TeamPageBundle {
    pub roster: Vec<TypedRecord>,
    pub team_opponent: Vec<TypedRecord>,
    pub team_misc: Vec<TypedRecord>,
    pub per_game: Vec<TypedRecord>,
    pub totals: Vec<TypedRecord>,
    pub salaries: Vec<TypedRecord>,
}

/// Assemble every dataset a team season page carries.
pub fn assemble_team_page(
    doc: &Html,
    team_id: &str,
    season_end_year: i32,
) -> Result<TeamPageBundle> {
    Ok(TeamPageBundle {
        roster: roster_records(doc, team_id, season_end_year)?,
        team_opponent: split_records(doc, team_id, season_end_year)?,
        team_misc: misc_records(doc, team_id, season_end_year)?,
        per_game: player_stat_records(
            doc,
            "per_game_stats",
            TableKind::PerGame,
            team_id,
            season_end_year,
        )?,
        totals: player_stat_records(
            doc,
            "totals_stats",
            TableKind::Totals,
            team_id,
            season_end_year,
        )?,
        salaries: salary_records(doc, team_id, season_end_year)?,
    })
}

fn stamp(record: &mut TypedRecord, team_id: &str, season_end_year: i32) {
    record.set("Tm_ID", team_id);
    record.set("Season_End_Year", i64::from(season_end_year));
}

fn roster_records(doc: &Html, team_id: &str, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "roster")? else {
        return Ok(Vec::new());
    };
    let spec = build_column_spec(&table, TableKind::Roster)?;

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let mut record = TypedRecord::new();
        add_player_identity(&mut record, &row);
        for (name, value) in typed_record(&row, &spec).iter() {
            record.set(name, value.clone());
        }
        stamp(&mut record, team_id, season_end_year);
        records.push(record);
    }
    Ok(records)
}

/// Team/opponent split rows, classified by their label cell. Rank and
/// year-over-year comparison rows carry no per-game data and are dropped.
fn split_records(doc: &Html, team_id: &str, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "team_and_opponent")? else {
        return Ok(Vec::new());
    };
    let spec = build_column_spec(&table, TableKind::TeamOpponent)?;

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let cells = row_cells(&row);
        let Some(first) = cells.first() else { continue };
        let label = cell_text(first);

        let stat_type = if label.contains("Lg Rank") || label.contains("Year/Year") {
            continue;
        } else if label.contains("Team/G") {
            "Team_Per_Game"
        } else if label.contains("Opponent/G") {
            "Opponent_Per_Game"
        } else if label == "Team" {
            "Team_Totals"
        } else if label == "Opponent" {
            "Opponent_Totals"
        } else {
            continue;
        };

        let mut record = typed_record(&row, &spec);
        record.set("Stat_Type", stat_type);
        stamp(&mut record, team_id, season_end_year);
        records.push(record);
    }
    Ok(records)
}

/// Team misc table: only the team's own row survives; the league-rank row
/// underneath it is presentation.
fn misc_records(doc: &Html, team_id: &str, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "team_misc")? else {
        return Ok(Vec::new());
    };
    let spec = build_column_spec(&table, TableKind::TeamMisc)?;

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let Some(first) = row_cells(&row).into_iter().next() else {
            continue;
        };
        if cell_text(&first) != "Team" {
            continue;
        }
        let mut record = typed_record(&row, &spec);
        stamp(&mut record, team_id, season_end_year);
        records.push(record);
    }
    Ok(records)
}

fn player_stat_records(
    doc: &Html,
    table_id: &str,
    kind: TableKind,
    team_id: &str,
    season_end_year: i32,
) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, table_id)? else {
        return Ok(Vec::new());
    };
    let spec = build_column_spec(&table, kind)?;

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let mut record = TypedRecord::new();
        add_player_identity(&mut record, &row);
        for (name, value) in typed_record(&row, &spec).iter() {
            record.set(name, value.clone());
        }
        if record.get("Player_Name_Stats") == Some(&CellValue::Str("Team Totals".into())) {
            continue;
        }
        stamp(&mut record, team_id, season_end_year);
        records.push(record);
    }
    Ok(records)
}

fn salary_records(doc: &Html, team_id: &str, season_end_year: i32) -> Result<Vec<TypedRecord>> {
    let Some(table) = find_table(doc, "salaries2")? else {
        return Ok(Vec::new());
    };
    let spec = build_column_spec(&table, TableKind::Salaries)?;

    let mut records = Vec::new();
    for row in data_rows(&table)? {
        let cells = row_cells(&row);
        // The player cell is positional here; the salary table carries no
        // per-cell keys in older markup.
        let Some(player_cell) = cells.get(1) else { continue };
        let player_name = cell_text(player_cell);
        if player_name.is_empty() {
            continue;
        }

        let mut record = TypedRecord::new();
        if let Some(player_id) = first_anchor_href(player_cell)
            .as_deref()
            .and_then(ids::player_id_from_href)
        {
            record.set("Player_ID", player_id);
        }
        record.set("Player_Name_Full", player_name);
        for (name, value) in typed_record(&row, &spec).iter() {
            record.set(name, value.clone());
        }
        stamp(&mut record, team_id, season_end_year);
        records.push(record);
    }
    Ok(records)
}

/// Player id and display name from the row's player cell, when present.
fn add_player_identity(record: &mut TypedRecord, row: &scraper::ElementRef<'_>) {
    let Some(cell) = cell_by_stat(row, "player") else {
        return;
    };
    if let Some(player_id) = first_anchor_href(&cell)
        .as_deref()
        .and_then(ids::player_id_from_href)
    {
        record.set("Player_ID", player_id);
    }
    let name = cell_text(&cell);
    if !name.is_empty() {
        record.set("Player_Name_Full", name);
    }
}
