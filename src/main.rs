// src/main.rs

//! bbref-harvest: basketball statistics scraping CLI
//!
//! Fetches historical statistics pages from the public reference site and
//! normalizes their HTML tables into flat CSV datasets, one file per
//! dataset kind.

mod assemble;
mod error;
mod models;
mod parse;
mod pipeline;
mod services;
mod storage;
mod utils;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::{run_all, run_games, run_standings, run_team_pages, run_totals};
use crate::services::Fetcher;
use crate::storage::LocalCsvSink;
use crate::utils::log;

#[derive(Parser, Debug)]
#[command(
    name = "bbref-harvest",
    version = "0.1.0",
    about = "Basketball statistics harvester"
)]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Override the first season-end year
    #[arg(long)]
    start_year: Option<i32>,

    /// Override the last season-end year
    #[arg(long)]
    end_year: Option<i32>,

    /// Override the output directory
    #[arg(short, long)]
    output: Option<String>,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch season standings tables
    Standings,
    /// Fetch league-wide player season totals
    Totals,
    /// Fetch schedules and per-game box scores
    Games,
    /// Fetch per-team pages (roster, splits, misc, stats, salaries)
    TeamPages {
        /// CSV of (Tm_ID, SeasonEndYear) pairs to iterate
        #[arg(long)]
        team_list: Option<String>,
    },
    /// Run every pipeline in order
    All,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::init();

    let mut config = Config::load_or_default(&cli.config);
    if let Some(year) = cli.start_year {
        config.run.start_year = year;
    }
    if let Some(year) = cli.end_year {
        config.run.end_year = year;
    }
    if let Some(dir) = cli.output {
        config.output.dir = dir;
    }
    if cli.quiet {
        config.logging.level = "warn".to_string();
    }

    // Initialize logging system
    log::init(&config.logging.level);
    config.validate()?;

    log::header(&format!(
        "Harvesting seasons {}-{}",
        config.run.start_year, config.run.end_year
    ));

    let mut fetcher = Fetcher::new(config.fetch.clone())?;
    let sink = LocalCsvSink::new(&config.output.dir);

    match cli.command {
        Command::Standings => run_standings(&config, &mut fetcher, &sink).await?,
        Command::Totals => run_totals(&config, &mut fetcher, &sink).await?,
        Command::Games => run_games(&config, &mut fetcher, &sink).await?,
        Command::TeamPages { team_list } => {
            if let Some(path) = team_list {
                config.run.team_list_file = path;
            }
            run_team_pages(&config, &mut fetcher, &sink).await?;
        }
        Command::All => run_all(&config, &mut fetcher, &sink).await?,
    }

    Ok(())
}
