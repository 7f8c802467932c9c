//! Command implementations for the nlgas CLI.
//!
//! Each subcommand loads the resources it needs (local files or http(s)
//! URLs, optionally gzip compressed), builds the matching view and prints
//! it as text or JSON.

use anyhow::Context;
use clap::{Args, Subcommand};
use nlgas_data::TieBreak;

pub mod config;
pub mod export;
pub mod query;
pub mod source;

use config::Settings;

/// Resource locations shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct Options {
    /// Consumption dataset (path or http(s) URL, .json or .json.gz)
    #[arg(
        short = 'd',
        long,
        global = true,
        default_value = "data/gas_consumption.json"
    )]
    pub data: String,

    /// Municipality boundaries GeoJSON (path or http(s) URL)
    #[arg(
        short = 'b',
        long,
        global = true,
        default_value = "data/municipalities.geojson"
    )]
    pub boundaries: String,

    /// JSON settings file overriding the suffix table and map colors
    #[arg(short = 'c', long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the years in the dataset with their record counts
    Years,

    /// National summary: trend of the national average and extremes
    Summary {
        /// Number of lowest and highest consumers to list
        #[arg(short = 'n', long, default_value_t = nlgas_views::home::DEFAULT_TOP_N)]
        top: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rank all municipalities of one year by ascending consumption
    Ranking {
        /// Year to rank (defaults to the latest year)
        #[arg(short = 'y', long)]
        year: Option<i32>,

        /// Order equal values by name instead of dataset order
        #[arg(long)]
        alphabetical_ties: bool,

        /// Only print the first N entries
        #[arg(short = 'l', long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Trend, ranks and year-over-year changes of one municipality
    Municipality {
        /// URL slug, e.g. "hengelo-gelderland"
        slug: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Join boundaries with one year of data and export the colored features
    Choropleth {
        /// Year to show (defaults to, or falls back to, the latest year)
        #[arg(short = 'y', long)]
        year: Option<i32>,

        /// Output file; the extension selects the format (.csv or .json)
        #[arg(short = 'o', long)]
        output: String,
    },

    /// List records whose names collapse to the same join key
    Collisions,
}

pub async fn run(options: &Options, command: Command) -> anyhow::Result<()> {
    let settings = Settings::load(options.config.as_deref()).await?;

    match command {
        Command::Years => {
            let dataset = source::load_dataset(&options.data, &settings).await?;
            print!("{}", query::render_years(&dataset)?);
        }
        Command::Summary { top, json } => {
            let dataset = source::load_dataset(&options.data, &settings).await?;
            print!("{}", query::run_summary(&dataset, top, json)?);
        }
        Command::Ranking {
            year,
            alphabetical_ties,
            limit,
            json,
        } => {
            let dataset = source::load_dataset(&options.data, &settings).await?;
            let Some(year) = year.or_else(|| dataset.latest_year()) else {
                println!("The dataset contains no records.");
                return Ok(());
            };
            let tie_break = if alphabetical_ties {
                TieBreak::Alphabetical
            } else {
                TieBreak::InputOrder
            };
            print!(
                "{}",
                query::run_ranking(&dataset, year, tie_break, limit, json)?
            );
        }
        Command::Municipality { slug, json } => {
            let dataset = source::load_dataset(&options.data, &settings).await?;
            print!("{}", query::run_municipality(&dataset, &slug, json)?);
        }
        Command::Choropleth { year, output } => {
            let (dataset, boundaries) =
                source::load_all(&options.data, &options.boundaries, &settings).await?;
            let map = export::build_map(&dataset, &boundaries, year, &settings.gradient)
                .context("The dataset contains no records")?;
            export::write_choropleth(&map, &output)?;
            println!(
                "Wrote {} features for {} to {}",
                map.features.len(),
                map.year,
                output
            );
        }
        Command::Collisions => {
            let dataset = source::load_dataset(&options.data, &settings).await?;
            print!("{}", query::render_collisions(&dataset.name_collisions())?);
        }
    }
    Ok(())
}
