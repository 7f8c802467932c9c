//! Municipality detail page: trend chart, ranks per year and deltas.

use nlgas_data::trend::{percent_change, sparkline_points, year_over_year};
use nlgas_data::{slugify, ConsumptionDataset, YearValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// Size of the sparkline drawing box.
pub const SPARKLINE_WIDTH: f64 = 120.0;
pub const SPARKLINE_HEIGHT: f64 = 32.0;

/// One year on the detail page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailYear {
    pub year: i32,
    pub consumption: f64,
    /// Change from the previous record; None for the first year.
    pub change_pct: Option<f64>,
    /// Rank within this year (1 = lowest consumer).
    pub rank: Option<usize>,
    pub total: Option<usize>,
    pub national_average: Option<f64>,
    /// Deviation from the national average in percent.
    pub vs_national_pct: Option<f64>,
}

/// Everything the detail page renders for one municipality.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    /// Display name as found in the dataset.
    pub municipality: String,
    pub normalized: String,
    pub slug: String,
    /// Chronological.
    pub years: Vec<DetailYear>,
    /// Change from the first to the last year on record.
    pub total_change_pct: Option<f64>,
    pub sparkline: Vec<(f64, f64)>,
}

impl DetailView {
    /// Build the detail page for `slug`.
    ///
    /// Returns `None` when no municipality has this slug; the caller shows
    /// a "not found" page.
    pub fn build(dataset: &ConsumptionDataset, slug: &str) -> Option<Self> {
        let municipality = dataset.find_municipality_by_slug(slug)?;
        let normalized = dataset.normalize(municipality);
        let history = dataset.municipality_history(municipality);

        let averages: BTreeMap<i32, f64> = dataset
            .national_averages()
            .into_iter()
            .map(|yv| (yv.year, yv.value))
            .collect();

        let years: Vec<DetailYear> = year_over_year(&history)
            .into_iter()
            .map(|change| {
                // Ranks are computed independently for every year.
                let ranking = dataset.ranking_for_year(change.year);
                let entry = ranking.get(&normalized);
                let national_average = averages.get(&change.year).copied();
                DetailYear {
                    year: change.year,
                    consumption: change.consumption,
                    change_pct: change.change_pct,
                    rank: entry.map(|e| e.rank),
                    total: entry.map(|e| e.total),
                    national_average,
                    vs_national_pct: national_average
                        .and_then(|avg| percent_change(avg, change.consumption)),
                }
            })
            .collect();

        let total_change_pct = match (years.first(), years.last()) {
            (Some(first), Some(last)) if years.len() > 1 => {
                percent_change(first.consumption, last.consumption)
            }
            _ => None,
        };
        let series: Vec<YearValue> = years
            .iter()
            .map(|y| YearValue {
                year: y.year,
                value: y.consumption,
            })
            .collect();

        log::info!(
            "[nlgas] views: detail {:?} with {} years",
            municipality,
            years.len()
        );
        Some(DetailView {
            municipality: municipality.to_string(),
            slug: slugify(municipality),
            normalized,
            sparkline: sparkline_points(&series, SPARKLINE_WIDTH, SPARKLINE_HEIGHT),
            years,
            total_change_pct,
        })
    }

    pub fn latest(&self) -> Option<&DetailYear> {
        self.years.last()
    }

    pub fn year(&self, year: i32) -> Option<&DetailYear> {
        self.years.iter().find(|y| y.year == year)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
