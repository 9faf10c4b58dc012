// src/assemble/schedule.rs

//! Schedule page assembler.
//!
//! Produces one record per scheduled game and the list of box-score pages
//! to visit afterwards. Games whose identifier cannot be derived from any
//! source (box-score link, sort key, date + home team) are dropped: a
//! guessed identifier would poison every joined dataset downstream.

use chrono::NaiveDate;
use scraper::Html;

use crate::error::Result;
use crate::models::{CellValue, TypedRecord};
use crate::parse::cells::int_value;
use crate::parse::locate::cell_text;
use crate::parse::rows::{cell_by_stat, data_rows, first_anchor_href};
use crate::parse::find_table;
use crate::utils::{ids, log};

/// A box-score page worth visiting, with the context its tables need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxScoreRef {
    pub game_id: String,
    pub href: String,
    pub home_team: Option<String>,
    pub visitor_team: Option<String>,
}

/// Assembled schedule rows plus follow-up box-score work.
#[derive(Debug, Default)]
pub struct ScheduleOutcome {
    pub records: Vec<TypedRecord>,
    pub box_scores: Vec<BoxScoreRef>,
}

/// Assemble schedule records from one (monthly) schedule page.
pub fn assemble_schedule(doc: &Html, season_end_year: i32) -> Result<ScheduleOutcome> {
    let mut outcome = ScheduleOutcome::default();

    let Some(table) = find_table(doc, "schedule")? else {
        log::warn(&format!(
            "Could not find schedule table for {season_end_year}"
        ));
        return Ok(outcome);
    };

    for row in data_rows(&table)? {
        let date_cell = cell_by_stat(&row, "date_game");
        let visitor_cell = cell_by_stat(&row, "visitor_team_name");
        let home_cell = cell_by_stat(&row, "home_team_name");
        let box_cell = cell_by_stat(&row, "box_score_text");

        let (Some(date_cell), Some(visitor_cell), Some(home_cell), Some(box_cell)) =
            (date_cell, visitor_cell, home_cell, box_cell)
        else {
            continue;
        };

        let raw_date = cell_text(&date_cell);
        let parsed_date = NaiveDate::parse_from_str(&raw_date, "%a, %b %d, %Y").ok();
        let game_date = parsed_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw_date.clone());

        let visitor_team = first_anchor_href(&visitor_cell)
            .as_deref()
            .and_then(ids::team_abbr_from_href);
        let home_team = first_anchor_href(&home_cell)
            .as_deref()
            .and_then(ids::team_abbr_from_href);
        let box_href = first_anchor_href(&box_cell);

        // Identifier resolution chain: explicit link, then the row's sort
        // key, then a synthesized id from date + home team.
        let game_id = box_href
            .as_deref()
            .and_then(ids::game_id_from_box_href)
            .or_else(|| {
                date_cell
                    .value()
                    .attr("csk")
                    .and_then(ids::game_id_from_sort_key)
            })
            .or_else(|| match (&home_team, parsed_date) {
                (Some(abbr), Some(_)) => {
                    Some(format!("{}0{abbr}", game_date.replace('-', "")))
                }
                _ => None,
            });
        let Some(game_id) = game_id else {
            log::warn(&format!(
                "Could not determine a game identifier for '{raw_date}'; dropping row"
            ));
            continue;
        };

        let home_pts = opt_int(cell_by_stat(&row, "home_pts"));
        let visitor_pts = opt_int(cell_by_stat(&row, "visitor_pts"));
        let (home_win, point_diff) = match (&home_pts, &visitor_pts) {
            (CellValue::Int(home), CellValue::Int(visitor)) => (
                CellValue::Int(i64::from(home > visitor)),
                CellValue::Int(home - visitor),
            ),
            _ => (CellValue::Null, CellValue::Null),
        };

        let mut record = TypedRecord::new();
        record.set("Game_ID", game_id.clone());
        record.set("Date", game_date);
        record.set("Start_Time_ET", opt_text(cell_by_stat(&row, "game_start_time")));
        record.set("Visitor_Team_Name", CellValue::from_text(&cell_text(&visitor_cell)));
        record.set("Visitor_Team_ID", opt_value(visitor_team.clone()));
        record.set("Visitor_PTS", visitor_pts);
        record.set("Home_Team_Name", CellValue::from_text(&cell_text(&home_cell)));
        record.set("Home_Team_ID", opt_value(home_team.clone()));
        record.set("Home_PTS", home_pts);
        record.set("Box_Score_Link", opt_value(box_href.clone()));
        record.set("Arena", opt_text(cell_by_stat(&row, "arena_name")));
        record.set("Attendance", opt_int(cell_by_stat(&row, "attendance")));
        record.set("Notes", opt_text(cell_by_stat(&row, "overtimes")));
        record.set("Season_End_Year", i64::from(season_end_year));
        record.set("Home_Win", home_win);
        record.set("Point_Differential", point_diff);
        record.set("Game_Duration", opt_text(cell_by_stat(&row, "game_duration")));
        outcome.records.push(record);

        match box_href {
            Some(href) => outcome.box_scores.push(BoxScoreRef {
                game_id,
                href,
                home_team,
                visitor_team,
            }),
            None => log::warn(&format!(
                "Skipping box score for {game_id}: no box score link"
            )),
        }
    }

    Ok(outcome)
}

fn opt_text(cell: Option<scraper::ElementRef<'_>>) -> CellValue {
    cell.map_or(CellValue::Null, |c| CellValue::from_text(&cell_text(&c)))
}

fn opt_int(cell: Option<scraper::ElementRef<'_>>) -> CellValue {
    cell.map_or(CellValue::Null, |c| int_value(&cell_text(&c)))
}

fn opt_value(value: Option<String>) -> CellValue {
    value.map_or(CellValue::Null, CellValue::Str)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three games: one with a box-score link, one with only a sort key,
    /// one resolvable only by synthesizing from date + home team.
    const SCHEDULE: &str = r#"
        <table id="schedule">
        <thead><tr><th data-stat="date_game">Date</th></tr></thead>
        <tbody>
        <tr>
            <th data-stat="date_game" csk="202410220BOS">Tue, Oct 22, 2024</th>
            <td data-stat="game_start_time">7:30p</td>
            <td data-stat="visitor_team_name"><a href="/teams/NYK/2025.html">New York Knicks</a></td>
            <td data-stat="visitor_pts">109</td>
            <td data-stat="home_team_name"><a href="/teams/BOS/2025.html">Boston Celtics</a></td>
            <td data-stat="home_pts">132</td>
            <td data-stat="box_score_text"><a href="/boxscores/202410220BOS.html">Box Score</a></td>
            <td data-stat="overtimes"></td>
            <td data-stat="attendance">19,156</td>
            <td data-stat="arena_name">TD Garden</td>
        </tr>
        <tr>
            <th data-stat="date_game" csk="202410230LAL">Wed, Oct 23, 2024</th>
            <td data-stat="visitor_team_name"><a href="/teams/MIN/2025.html">Minnesota Timberwolves</a></td>
            <td data-stat="visitor_pts"></td>
            <td data-stat="home_team_name"><a href="/teams/LAL/2025.html">Los Angeles Lakers</a></td>
            <td data-stat="home_pts"></td>
            <td data-stat="box_score_text"></td>
        </tr>
        <tr>
            <th data-stat="date_game">Thu, Oct 24, 2024</th>
            <td data-stat="visitor_team_name"><a href="/teams/PHO/2025.html">Phoenix Suns</a></td>
            <td data-stat="visitor_pts">116</td>
            <td data-stat="home_team_name"><a href="/teams/DEN/2025.html">Denver Nuggets</a></td>
            <td data-stat="home_pts">110</td>
            <td data-stat="box_score_text"></td>
        </tr>
        </tbody>
        </table>
    "#;

    fn outcome() -> ScheduleOutcome {
        let doc = Html::parse_document(SCHEDULE);
        assemble_schedule(&doc, 2025).unwrap()
    }

    #[test]
    fn test_emits_all_games_but_only_linked_box_scores() {
        let outcome = outcome();
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.box_scores.len(), 1);
        assert_eq!(outcome.box_scores[0].game_id, "202410220BOS");
    }

    #[test]
    fn test_identifier_resolution_chain() {
        let outcome = outcome();
        let ids: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.get("Game_ID").unwrap().csv_field())
            .collect();
        assert_eq!(ids, vec!["202410220BOS", "202410230LAL", "202410240DEN"]);
    }

    #[test]
    fn test_score_derivations_only_when_both_scores_present() {
        let outcome = outcome();
        let played = &outcome.records[0];
        assert_eq!(played.get("Home_Win"), Some(&CellValue::Int(1)));
        assert_eq!(played.get("Point_Differential"), Some(&CellValue::Int(23)));
        assert_eq!(played.get("Attendance"), Some(&CellValue::Int(19156)));
        assert_eq!(played.get("Date"), Some(&CellValue::Str("2024-10-22".into())));

        let unplayed = &outcome.records[1];
        assert_eq!(unplayed.get("Home_Win"), Some(&CellValue::Null));
        assert_eq!(unplayed.get("Point_Differential"), Some(&CellValue::Null));
    }

    #[test]
    fn test_row_without_any_identifier_is_dropped() {
        let html = r#"
            <table id="schedule"><tbody>
            <tr>
                <th data-stat="date_game">Playoffs</th>
                <td data-stat="visitor_team_name">TBD</td>
                <td data-stat="home_team_name">TBD</td>
                <td data-stat="box_score_text"></td>
            </tr>
            </tbody></table>
        "#;
        let doc = Html::parse_document(html);
        let outcome = assemble_schedule(&doc, 2025).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.box_scores.is_empty());
    }

    #[test]
    fn test_missing_schedule_table_is_empty_not_error() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        let outcome = assemble_schedule(&doc, 2025).unwrap();
        assert!(outcome.records.is_empty());
    }
}
