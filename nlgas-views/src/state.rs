//! Page state passed into the view builders.
//!
//! `ViewState` bundles what the user has picked (year, municipality) and
//! what the pointer is over. It holds no data of its own; views read it and
//! query the dataset.

use nlgas_data::ConsumptionDataset;
use serde::{Deserialize, Serialize};

/// Selection and hover state for the front-end pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Year chosen in the year selector (None until the user picks one)
    pub selected_year: Option<i32>,
    /// Slug of the municipality whose detail page is open
    pub selected_slug: Option<String>,
    /// Normalized name of the municipality under the pointer
    pub hovered: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.selected_year = Some(year);
        self
    }

    pub fn select_year(&mut self, year: i32) {
        self.selected_year = Some(year);
    }

    pub fn select_municipality(&mut self, slug: impl Into<String>) {
        self.selected_slug = Some(slug.into());
    }

    pub fn clear_selection(&mut self) {
        self.selected_slug = None;
    }

    pub fn hover(&mut self, normalized: impl Into<String>) {
        self.hovered = Some(normalized.into());
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Year the map should show.
    ///
    /// The selected year if the dataset has it, otherwise the most recent
    /// year. `None` only for an empty dataset.
    pub fn effective_year(&self, dataset: &ConsumptionDataset) -> Option<i32> {
        let available = dataset.available_years();
        match self.selected_year {
            Some(year) if available.contains(&year) => Some(year),
            Some(year) => {
                log::warn!(
                    "[nlgas] views: year {} not in dataset, falling back to latest",
                    year
                );
                available.first().copied()
            }
            None => available.first().copied(),
        }
    }
}
