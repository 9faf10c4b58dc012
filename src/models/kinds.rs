// src/models/kinds.rs

//! Table and dataset kind enums.
//!
//! A `TableKind` names the semantic category of one HTML table and selects
//! which header-normalization and row-skip rules apply to it. A
//! `DatasetKind` names one output artifact.

use std::fmt;

/// Semantic category of a source HTML table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Schedule,
    LineScore,
    FourFactors,
    BoxBasic,
    BoxAdvanced,
    Roster,
    TeamOpponent,
    TeamMisc,
    PerGame,
    Totals,
    Salaries,
    Standings,
    LeagueTotals,
}

impl TableKind {
    /// Whether column names should be derived from the machine-readable
    /// `data-stat` key rather than the visible header label.
    ///
    /// Box-score, standings and league-totals tables carry stable keys on
    /// every cell; the per-team tables are labeled for humans and keyed
    /// inconsistently, so their visible labels are the better base.
    pub fn prefers_data_key(&self) -> bool {
        matches!(
            self,
            TableKind::BoxBasic
                | TableKind::BoxAdvanced
                | TableKind::Standings
                | TableKind::LeagueTotals
        )
    }
}

/// One output dataset, mapped to a single flat CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Schedule,
    LineScores,
    FourFactors,
    PlayerBasic,
    PlayerAdvanced,
    GameMeta,
    Standings,
    Rosters,
    TeamOpponent,
    TeamMisc,
    PerGame,
    PlayerTotals,
    Salaries,
    LeagueTotals,
}

impl DatasetKind {
    /// File name of the emitted CSV artifact.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::Schedule => "games_schedule.csv",
            DatasetKind::LineScores => "game_line_scores.csv",
            DatasetKind::FourFactors => "game_four_factors.csv",
            DatasetKind::PlayerBasic => "game_player_basic_stats.csv",
            DatasetKind::PlayerAdvanced => "game_player_advanced_stats.csv",
            DatasetKind::GameMeta => "game_meta_info.csv",
            DatasetKind::Standings => "nba_team_standings.csv",
            DatasetKind::Rosters => "parsed_team_rosters.csv",
            DatasetKind::TeamOpponent => "parsed_team_opponent_stats.csv",
            DatasetKind::TeamMisc => "parsed_team_misc_stats.csv",
            DatasetKind::PerGame => "parsed_player_per_game_stats.csv",
            DatasetKind::PlayerTotals => "parsed_player_totals_stats.csv",
            DatasetKind::Salaries => "parsed_team_salaries.csv",
            DatasetKind::LeagueTotals => "nba_player_totals.csv",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Schedule => "schedule",
            DatasetKind::LineScores => "line scores",
            DatasetKind::FourFactors => "four factors",
            DatasetKind::PlayerBasic => "player basic box stats",
            DatasetKind::PlayerAdvanced => "player advanced box stats",
            DatasetKind::GameMeta => "game meta",
            DatasetKind::Standings => "team standings",
            DatasetKind::Rosters => "team rosters",
            DatasetKind::TeamOpponent => "team/opponent splits",
            DatasetKind::TeamMisc => "team misc",
            DatasetKind::PerGame => "player per-game stats",
            DatasetKind::PlayerTotals => "player season totals",
            DatasetKind::Salaries => "team salaries",
            DatasetKind::LeagueTotals => "league player totals",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_key_preference() {
        assert!(TableKind::BoxBasic.prefers_data_key());
        assert!(TableKind::Standings.prefers_data_key());
        assert!(!TableKind::Roster.prefers_data_key());
        assert!(!TableKind::Salaries.prefers_data_key());
    }

    #[test]
    fn test_file_names_are_unique() {
        let kinds = [
            DatasetKind::Schedule,
            DatasetKind::LineScores,
            DatasetKind::FourFactors,
            DatasetKind::PlayerBasic,
            DatasetKind::PlayerAdvanced,
            DatasetKind::GameMeta,
            DatasetKind::Standings,
            DatasetKind::Rosters,
            DatasetKind::TeamOpponent,
            DatasetKind::TeamMisc,
            DatasetKind::PerGame,
            DatasetKind::PlayerTotals,
            DatasetKind::Salaries,
            DatasetKind::LeagueTotals,
        ];
        let names: std::collections::HashSet<_> =
            kinds.iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), kinds.len());
    }
}
