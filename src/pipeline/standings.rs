// src/pipeline/standings.rs

//! Standings pipeline: one standings page per season-end year.

use scraper::Html;

use crate::assemble::{STANDINGS_COLUMNS, assemble_standings};
use crate::error::Result;
use crate::models::{Config, Dataset, DatasetKind};
use crate::services::{Fetcher, PageClass};
use crate::storage::DatasetSink;
use crate::parse::unmask;
use crate::utils::log;

use super::emit_datasets;

/// Fetch and assemble standings for the configured year range.
pub async fn run_standings(
    config: &Config,
    fetcher: &mut Fetcher,
    sink: &dyn DatasetSink,
) -> Result<()> {
    let mut dataset = Dataset::with_columns(DatasetKind::Standings, STANDINGS_COLUMNS);

    for year in config.run.years() {
        let url = format!("{}/leagues/NBA_{year}_standings.html", config.run.base_url);
        log::info(&format!(
            "Fetching team standings for season ending {year} from {url}"
        ));

        let body = match fetcher.fetch(&url, PageClass::List).await {
            Ok(body) => body,
            Err(error) => {
                log::warn(&format!("Skipping standings for {year}: {error}"));
                continue;
            }
        };

        let records = {
            let doc = Html::parse_document(&unmask(&body));
            assemble_standings(&doc, year)
        };
        match records {
            Ok(records) => {
                log::info(&format!(
                    "Parsed {} team entries for season ending {year}",
                    records.len()
                ));
                dataset.extend(records);
            }
            Err(error) => log::warn(&format!("Skipping standings for {year}: {error}")),
        }
    }

    emit_datasets(sink, vec![dataset]).await
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::models::FetchConfig;
    use crate::storage::LocalCsvSink;

    const STANDINGS_PAGE: &str = r#"
        <html><body>
        <table id="confs_standings_E"><tbody>
            <tr>
                <th data-stat="team_name"><a href="/teams/BOS/2024.html">Boston Celtics</a>*</th>
                <td data-stat="wins">64</td><td data-stat="losses">18</td>
            </tr>
        </tbody></table>
        <table id="confs_standings_W"><tbody>
            <tr>
                <th data-stat="team_name"><a href="/teams/OKC/2024.html">Oklahoma City Thunder</a>*</th>
                <td data-stat="wins">57</td><td data-stat="losses">25</td>
            </tr>
        </tbody></table>
        </body></html>
    "#;

    fn instant_config(base_url: String, out_dir: String) -> Config {
        let mut config = Config::default();
        config.fetch = FetchConfig {
            list_delay_secs: 0,
            item_delay_secs: 0,
            initial_backoff_secs: 0,
            ..FetchConfig::default()
        };
        config.run.start_year = 2024;
        config.run.end_year = 2024;
        config.run.base_url = base_url;
        config.output.dir = out_dir;
        config
    }

    #[tokio::test]
    async fn test_run_emits_combined_standings() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/leagues/NBA_2024_standings.html");
                then.status(200).body(STANDINGS_PAGE);
            })
            .await;

        let tmp = TempDir::new().unwrap();
        let config = instant_config(
            server.base_url(),
            tmp.path().to_string_lossy().into_owned(),
        );
        let mut fetcher = Fetcher::new(config.fetch.clone()).unwrap();
        let sink = LocalCsvSink::new(tmp.path());

        run_standings(&config, &mut fetcher, &sink).await.unwrap();

        let content =
            std::fs::read_to_string(tmp.path().join("nba_team_standings.csv")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SeasonEndYear,Conference,Division,Team,Tm_ID"));
        assert!(lines[1].contains("East"));
        assert!(lines[2].contains("West"));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_year_without_output() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/leagues/NBA_2024_standings.html");
                then.status(404);
            })
            .await;

        let tmp = TempDir::new().unwrap();
        let config = instant_config(
            server.base_url(),
            tmp.path().to_string_lossy().into_owned(),
        );
        let mut fetcher = Fetcher::new(config.fetch.clone()).unwrap();
        let sink = LocalCsvSink::new(tmp.path());

        run_standings(&config, &mut fetcher, &sink).await.unwrap();
        assert!(!tmp.path().join("nba_team_standings.csv").exists());
    }
}
