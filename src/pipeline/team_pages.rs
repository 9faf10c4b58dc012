// src/pipeline/team_pages.rs

//! Team-pages pipeline: one page per (team, season) pair.
//!
//! Iteration is driven by a local CSV of team/season identifiers. By
//! default that is the standings dataset emitted earlier, which carries
//! `Tm_ID` and `SeasonEndYear` columns for every team-season.

use std::path::{Path, PathBuf};

use scraper::Html;

use crate::assemble::assemble_team_page;
use crate::error::{AppError, Result};
use crate::models::{Config, Dataset, DatasetKind};
use crate::parse::unmask;
use crate::services::{Fetcher, PageClass};
use crate::storage::DatasetSink;
use crate::utils::log;

use super::emit_datasets;

/// One unit of per-team work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSeason {
    pub team_id: String,
    pub year: i32,
}

/// Read the (Tm_ID, SeasonEndYear) pairs that drive per-team iteration.
/// Malformed rows are logged and skipped.
pub fn read_team_list(path: &Path) -> Result<Vec<TeamSeason>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let team_index = headers
        .iter()
        .position(|h| h == "Tm_ID")
        .ok_or_else(|| AppError::config(format!("{} lacks a Tm_ID column", path.display())))?;
    let year_index = headers.iter().position(|h| h == "SeasonEndYear").ok_or_else(|| {
        AppError::config(format!("{} lacks a SeasonEndYear column", path.display()))
    })?;

    let mut teams = Vec::new();
    for row in reader.records() {
        let row = row?;
        let team_id = row.get(team_index).unwrap_or("").trim();
        let year = row.get(year_index).unwrap_or("").trim();
        if team_id.is_empty() {
            continue;
        }
        match year.parse::<i32>() {
            Ok(year) => teams.push(TeamSeason {
                team_id: team_id.to_string(),
                year,
            }),
            Err(_) => log::warn(&format!(
                "Skipping team list row for {team_id}: bad season year '{year}'"
            )),
        }
    }
    Ok(teams)
}

/// Fetch and assemble every table of every listed team season page.
pub async fn run_team_pages(
    config: &Config,
    fetcher: &mut Fetcher,
    sink: &dyn DatasetSink,
) -> Result<()> {
    let list_path = if config.run.team_list_file.is_empty() {
        Path::new(&config.output.dir).join(DatasetKind::Standings.file_name())
    } else {
        PathBuf::from(&config.run.team_list_file)
    };
    let teams = read_team_list(&list_path)?;
    log::info(&format!(
        "Loaded {} team-season pairs from {}",
        teams.len(),
        list_path.display()
    ));

    let mut rosters = Dataset::new(DatasetKind::Rosters);
    let mut team_opponent = Dataset::new(DatasetKind::TeamOpponent);
    let mut team_misc = Dataset::new(DatasetKind::TeamMisc);
    let mut per_game = Dataset::new(DatasetKind::PerGame);
    let mut totals = Dataset::new(DatasetKind::PlayerTotals);
    let mut salaries = Dataset::new(DatasetKind::Salaries);

    for team in teams {
        let url = format!(
            "{}/teams/{}/{}.html",
            config.run.base_url, team.team_id, team.year
        );
        log::info(&format!(
            "Fetching data for {} - season {}",
            team.team_id, team.year
        ));

        let body = match fetcher.fetch(&url, PageClass::Item).await {
            Ok(body) => body,
            Err(error) => {
                log::warn(&format!(
                    "Skipping {} for {}: {error}",
                    team.team_id, team.year
                ));
                continue;
            }
        };

        let bundle = {
            let doc = Html::parse_document(&unmask(&body));
            assemble_team_page(&doc, &team.team_id, team.year)
        };
        match bundle {
            Ok(bundle) => {
                rosters.extend(bundle.roster);
                team_opponent.extend(bundle.team_opponent);
                team_misc.extend(bundle.team_misc);
                per_game.extend(bundle.per_game);
                totals.extend(bundle.totals);
                salaries.extend(bundle.salaries);
            }
            Err(error) => log::warn(&format!(
                "Skipping {} for {}: {error}",
                team.team_id, team.year
            )),
        }
    }

    emit_datasets(
        sink,
        vec![rosters, team_opponent, team_misc, per_game, totals, salaries],
    )
    .await
}
