//! Choropleth map page.
//!
//! Data flow:
//! 1. The year comes from [`ViewState::effective_year`].
//! 2. `consumption_by_year` gives the value per normalized name.
//! 3. Each boundary feature's `statnaam` is normalized with the dataset's
//!    suffix table and looked up; a miss yields "no data", never an error.
//! 4. Colors use the global range over all years, so a year with a
//!    narrower spread still sits on the same scale.

use crate::state::ViewState;
use nlgas_data::{
    slugify, BoundaryCollection, BoundingBox, ConsumptionDataset, ConsumptionRange, Gradient,
    LegendStop, Rgb,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Number of legend stops shown under the map.
pub const LEGEND_STEPS: usize = 5;

/// One municipality polygon with its value and fill color.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoroplethFeature {
    /// `statnaam` from the boundary file.
    pub name: String,
    /// Join key shared with the consumption records.
    pub normalized: String,
    /// Route of the detail page (slug of the dataset's display name).
    pub slug: String,
    pub statcode: Option<String>,
    /// None when there is no record for this year.
    pub consumption: Option<f64>,
    pub color: Rgb,
    pub rank: Option<usize>,
    pub total: Option<usize>,
}

/// Tooltip content for the hovered municipality.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoverInfo {
    pub name: String,
    pub year: i32,
    pub consumption: Option<f64>,
    pub color: Rgb,
    pub rank: Option<usize>,
    pub total: Option<usize>,
}

/// Everything the map renderer needs for one year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub year: i32,
    pub range: ConsumptionRange,
    pub legend: Vec<LegendStop>,
    pub no_data_color: Rgb,
    pub features: Vec<ChoroplethFeature>,
    /// Features whose municipality has records, but none for this year.
    pub missing_year: usize,
    /// Features whose name matches no record at all (join failures).
    pub unmatched: usize,
    /// Normalized names with data this year but no boundary feature.
    pub without_feature: Vec<String>,
    pub bounds: Option<BoundingBox>,
}

impl MapView {
    /// Join `boundaries` with the consumption values of `year`.
    pub fn build(
        dataset: &ConsumptionDataset,
        boundaries: &BoundaryCollection,
        year: i32,
        gradient: &Gradient,
    ) -> Self {
        let by_name = dataset.consumption_by_year(year);
        let ranking = dataset.ranking_for_year(year);
        let range = dataset.consumption_range();

        // Later records overwrite earlier ones, as in consumption_by_year.
        let display_names: HashMap<String, &str> = dataset
            .records()
            .iter()
            .map(|r| (dataset.normalize(&r.municipality), r.municipality.as_str()))
            .collect();

        let mut missing_year = 0;
        let mut unmatched = 0;
        let mut joined: HashSet<String> = HashSet::new();
        let mut features = Vec::with_capacity(boundaries.len());

        for feature in &boundaries.features {
            let normalized = dataset.normalize(feature.name());
            let consumption = by_name.get(&normalized).copied();
            let display = display_names.get(&normalized).copied();
            match (consumption, display) {
                (Some(_), _) => {
                    joined.insert(normalized.clone());
                }
                (None, Some(_)) => missing_year += 1,
                (None, None) => {
                    unmatched += 1;
                    log::debug!(
                        "[nlgas] views: boundary {:?} matches no consumption record",
                        feature.name()
                    );
                }
            }
            let rank = ranking.get(&normalized);
            features.push(ChoroplethFeature {
                name: feature.name().to_string(),
                slug: slugify(display.unwrap_or(feature.name())),
                statcode: feature.statcode().map(str::to_string),
                consumption,
                color: gradient.color_in(consumption, &range),
                rank: rank.map(|e| e.rank),
                total: rank.map(|e| e.total),
                normalized,
            });
        }

        let without_feature: Vec<String> = by_name
            .keys()
            .filter(|name| !joined.contains(*name))
            .cloned()
            .collect();
        if !without_feature.is_empty() {
            log::debug!(
                "[nlgas] views: {} municipalities with data have no boundary in {}",
                without_feature.len(),
                year
            );
        }
        log::info!(
            "[nlgas] views: map {} joined {} of {} features ({} without data this year, {} unmatched)",
            year,
            joined.len(),
            features.len(),
            missing_year,
            unmatched
        );

        MapView {
            year,
            range,
            legend: gradient.legend(&range, LEGEND_STEPS),
            no_data_color: gradient.no_data,
            features,
            missing_year,
            unmatched,
            without_feature,
            bounds: boundaries.bounds(),
        }
    }

    /// Build the map for the state's effective year.
    pub fn for_state(
        dataset: &ConsumptionDataset,
        boundaries: &BoundaryCollection,
        state: &ViewState,
        gradient: &Gradient,
    ) -> Option<Self> {
        state
            .effective_year(dataset)
            .map(|year| Self::build(dataset, boundaries, year, gradient))
    }

    pub fn feature(&self, normalized: &str) -> Option<&ChoroplethFeature> {
        self.features.iter().find(|f| f.normalized == normalized)
    }

    /// Tooltip for `state.hovered`, if it names a feature on this map.
    pub fn hover_info(&self, state: &ViewState) -> Option<HoverInfo> {
        let hovered = state.hovered.as_deref()?;
        let feature = self.feature(hovered)?;
        Some(HoverInfo {
            name: feature.name.clone(),
            year: self.year,
            consumption: feature.consumption,
            color: feature.color,
            rank: feature.rank,
            total: feature.total,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
