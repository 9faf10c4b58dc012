// src/assemble/mod.rs

//! Entity-specific assemblers.
//!
//! Each assembler composes the table locator, header normalizer and row
//! extractor for one source page family, injects the join keys the raw
//! tables omit (season year, team and game identifiers), and applies the
//! dataset-specific row filters.

mod box_score;
mod player_totals;
mod schedule;
mod standings;
mod team_page;

pub use box_score::{BoxScoreBundle, assemble_box_score};
pub use player_totals::{assemble_league_totals, league_totals_columns};
pub use schedule::{BoxScoreRef, ScheduleOutcome, assemble_schedule};
pub use standings::{STANDINGS_COLUMNS, assemble_standings};
pub use team_page::{TeamPageBundle, assemble_team_page};
