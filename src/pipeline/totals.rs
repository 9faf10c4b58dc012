// src/pipeline/totals.rs

//! League player-totals pipeline: one totals page per season-end year.

use scraper::Html;

use crate::assemble::{assemble_league_totals, league_totals_columns};
use crate::error::Result;
use crate::models::{Config, Dataset, DatasetKind};
use crate::parse::unmask;
use crate::services::{Fetcher, PageClass};
use crate::storage::DatasetSink;
use crate::utils::log;

use super::emit_datasets;

/// Fetch and assemble league player totals for the configured year range.
pub async fn run_totals(
    config: &Config,
    fetcher: &mut Fetcher,
    sink: &dyn DatasetSink,
) -> Result<()> {
    let columns = league_totals_columns();
    let mut dataset = Dataset::with_columns(DatasetKind::LeagueTotals, &columns);

    for year in config.run.years() {
        let url = format!("{}/leagues/NBA_{year}_totals.html", config.run.base_url);
        log::info(&format!(
            "Fetching player totals for season ending {year} from {url}"
        ));

        let body = match fetcher.fetch(&url, PageClass::List).await {
            Ok(body) => body,
            Err(error) => {
                log::warn(&format!("Skipping player totals for {year}: {error}"));
                continue;
            }
        };

        let records = {
            let doc = Html::parse_document(&unmask(&body));
            assemble_league_totals(&doc, year)
        };
        match records {
            Ok(records) => {
                log::info(&format!(
                    "Parsed {} player entries for season ending {year}",
                    records.len()
                ));
                dataset.extend(records);
            }
            Err(error) => log::warn(&format!("Skipping player totals for {year}: {error}")),
        }
    }

    emit_datasets(sink, vec![dataset]).await
}
