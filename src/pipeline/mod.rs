// src/pipeline/mod.rs

//! Pipeline entry points, one per dataset family.
//!
//! - `run_standings`: season standings tables
//! - `run_totals`: league-wide player season totals
//! - `run_games`: schedules plus per-game box scores
//! - `run_team_pages`: rosters, splits, misc, per-player stats, salaries
//!
//! Every unit of work (one page, one game, one team-season) that fails is
//! logged and skipped; a run always executes to completion and emits
//! whatever datasets it could produce.

pub mod games;
pub mod standings;
pub mod team_pages;
pub mod totals;

pub use games::run_games;
pub use standings::run_standings;
pub use team_pages::run_team_pages;
pub use totals::run_totals;

use crate::error::Result;
use crate::models::{Config, Dataset, DatasetKind};
use crate::services::Fetcher;
use crate::storage::{DatasetSink, WriteSummary};
use crate::utils::log;

/// Run the full pipeline: standings first, since the team-page step can
/// be driven by the standings output.
pub async fn run_all(
    config: &Config,
    fetcher: &mut Fetcher,
    sink: &dyn DatasetSink,
) -> Result<()> {
    log::step(1, 4, "Standings - season standings tables");
    run_standings(config, fetcher, sink).await?;

    log::step(2, 4, "Totals - league player season totals");
    run_totals(config, fetcher, sink).await?;

    log::step(3, 4, "Games - schedules and box scores");
    run_games(config, fetcher, sink).await?;

    log::step(4, 4, "Team pages - rosters, splits and salaries");
    run_team_pages(config, fetcher, sink).await?;

    log::success("Full harvest complete");
    Ok(())
}

/// Write each non-empty dataset exactly once and report what landed.
pub(crate) async fn emit_datasets(sink: &dyn DatasetSink, datasets: Vec<Dataset>) -> Result<()> {
    let mut written: Vec<(DatasetKind, WriteSummary)> = Vec::new();

    for dataset in datasets {
        if dataset.is_empty() {
            log::info(&format!("No {} records were produced", dataset.kind()));
            continue;
        }
        let summary = sink.write_dataset(&dataset).await?;
        log::success(&format!(
            "Saved {} {} records to {}",
            dataset.len(),
            dataset.kind(),
            summary.location
        ));
        written.push((dataset.kind(), summary));
    }

    if !written.is_empty() {
        let items: Vec<(&str, String)> = written
            .iter()
            .map(|(kind, summary)| {
                (
                    kind.file_name(),
                    format!("{} rows, {} columns", summary.rows, summary.columns),
                )
            })
            .collect();
        log::summary("Datasets written", &items);
    }
    Ok(())
}
