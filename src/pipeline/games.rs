// src/pipeline/games.rs

//! Games pipeline: season schedule pages, their monthly sub-pages, and
//! every linked box score.
//!
//! Seasons split their schedule across monthly pages discovered from the
//! index page's filter links. Schedule rows without a box-score link are
//! still emitted as schedule records, but produce no box-score fetch.

use std::collections::BTreeSet;

use scraper::Html;

use crate::assemble::{assemble_box_score, assemble_schedule};
use crate::error::Result;
use crate::models::{Config, Dataset, DatasetKind};
use crate::parse::locate::parse_selector;
use crate::parse::unmask;
use crate::services::{Fetcher, PageClass};
use crate::storage::DatasetSink;
use crate::utils::{log, resolve};

use super::emit_datasets;

/// Fetch and assemble schedules plus box scores for the configured years.
pub async fn run_games(
    config: &Config,
    fetcher: &mut Fetcher,
    sink: &dyn DatasetSink,
) -> Result<()> {
    let mut schedule = Dataset::new(DatasetKind::Schedule);
    let mut line_scores = Dataset::new(DatasetKind::LineScores);
    let mut four_factors = Dataset::new(DatasetKind::FourFactors);
    let mut player_basic = Dataset::new(DatasetKind::PlayerBasic);
    let mut player_advanced = Dataset::new(DatasetKind::PlayerAdvanced);
    let mut game_meta = Dataset::new(DatasetKind::GameMeta);

    for year in config.run.years() {
        log::info(&format!("Processing season ending {year}"));
        let index_url = format!("{}/leagues/NBA_{year}_games.html", config.run.base_url);

        let body = match fetcher.fetch(&index_url, PageClass::List).await {
            Ok(body) => body,
            Err(error) => {
                log::warn(&format!("Skipping season {year}: {error}"));
                continue;
            }
        };
        let months = {
            let doc = Html::parse_document(&unmask(&body));
            month_links(&doc, &config.run.base_url, &index_url)
        };

        for month_url in months {
            log::info(&format!("Processing month page {month_url}"));
            let body = match fetcher.fetch(&month_url, PageClass::List).await {
                Ok(body) => body,
                Err(error) => {
                    log::warn(&format!("Skipping month page {month_url}: {error}"));
                    continue;
                }
            };

            let outcome = {
                let doc = Html::parse_document(&unmask(&body));
                assemble_schedule(&doc, year)
            };
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(error) => {
                    log::warn(&format!("Skipping month page {month_url}: {error}"));
                    continue;
                }
            };
            schedule.extend(outcome.records);

            for box_ref in outcome.box_scores {
                let Some(box_url) = resolve(&config.run.base_url, &box_ref.href) else {
                    log::warn(&format!(
                        "Unresolvable box score link '{}' for {}",
                        box_ref.href, box_ref.game_id
                    ));
                    continue;
                };
                let body = match fetcher.fetch(&box_url, PageClass::Item).await {
                    Ok(body) => body,
                    Err(error) => {
                        log::warn(&format!(
                            "Skipping box score {}: {error}",
                            box_ref.game_id
                        ));
                        continue;
                    }
                };

                let bundle = {
                    let doc = Html::parse_document(&unmask(&body));
                    assemble_box_score(
                        &doc,
                        &box_ref.game_id,
                        year,
                        box_ref.home_team.as_deref(),
                        box_ref.visitor_team.as_deref(),
                    )
                };
                match bundle {
                    Ok(bundle) => {
                        line_scores.extend(bundle.line_scores);
                        four_factors.extend(bundle.four_factors);
                        player_basic.extend(bundle.player_basic);
                        player_advanced.extend(bundle.player_advanced);
                        game_meta.push(bundle.game_meta);
                    }
                    Err(error) => log::warn(&format!(
                        "Skipping box score {}: {error}",
                        box_ref.game_id
                    )),
                }
            }
        }
    }

    emit_datasets(
        sink,
        vec![
            schedule,
            line_scores,
            four_factors,
            player_basic,
            player_advanced,
            game_meta,
        ],
    )
    .await
}

/// Month links from the schedule index's filter block, resolved against
/// the site root. A season without monthly sub-pages is processed through
/// its index page alone.
fn month_links(doc: &Html, base_url: &str, index_url: &str) -> Vec<String> {
    let Ok(selector) = parse_selector("div.filter a[href]") else {
        return vec![index_url.to_string()];
    };

    let mut urls = BTreeSet::new();
    for anchor in doc.select(&selector) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(url) = resolve(base_url, href) {
                urls.insert(url);
            }
        }
    }

    if urls.is_empty() {
        vec![index_url.to_string()]
    } else {
        urls.into_iter().collect()
    }
}
