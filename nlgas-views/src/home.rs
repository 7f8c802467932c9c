//! National summary landing page.

use nlgas_data::trend::percent_change;
use nlgas_data::{ConsumptionDataset, RankEntry, YearValue};
use serde::Serialize;

/// Default length of the lowest / highest lists.
pub const DEFAULT_TOP_N: usize = 5;

/// Headline figures and the national trend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HomeView {
    pub latest_year: Option<i32>,
    /// National average per year, chronological.
    pub national_trend: Vec<YearValue>,
    /// Change of the national average from the first to the latest year.
    pub national_change_pct: Option<f64>,
    /// Lowest consumers in the latest year, lowest first.
    pub lowest: Vec<RankEntry>,
    /// Highest consumers in the latest year, highest first.
    pub highest: Vec<RankEntry>,
    /// Distinct normalized names across all years.
    pub municipality_count: usize,
    pub record_count: usize,
    pub unit: Option<String>,
}

impl HomeView {
    pub fn build(dataset: &ConsumptionDataset, top_n: usize) -> Self {
        let national_trend = dataset.national_averages();
        let national_change_pct = match (national_trend.first(), national_trend.last()) {
            (Some(first), Some(last)) if national_trend.len() > 1 => {
                percent_change(first.value, last.value)
            }
            _ => None,
        };

        let latest_year = dataset.latest_year();
        let (lowest, highest) = match latest_year {
            Some(year) => {
                let ranking = dataset.ranking_for_year(year);
                (
                    ranking.lowest(top_n).to_vec(),
                    ranking.highest(top_n).into_iter().cloned().collect(),
                )
            }
            None => (Vec::new(), Vec::new()),
        };

        let mut normalized: Vec<String> = dataset
            .municipality_names()
            .into_iter()
            .map(|name| dataset.normalize(name))
            .collect();
        normalized.sort();
        normalized.dedup();

        HomeView {
            latest_year,
            national_trend,
            national_change_pct,
            lowest,
            highest,
            municipality_count: normalized.len(),
            record_count: dataset.len(),
            unit: dataset.metadata().unit().map(str::to_string),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
