//! Core data layer for Dutch municipal natural-gas consumption (2015–2024).
//!
//! This crate turns a flat list of (municipality, year, consumption) records
//! into the aggregates a choropleth map and its detail pages need. It never
//! performs I/O: resources are fetched elsewhere and handed over as strings
//! or bytes.
//!
//! # Architecture
//!
//! - [`ConsumptionDataset`] owns the records, their metadata and the
//!   [`SuffixTable`] used to build join keys. It is immutable once loaded.
//! - Loading lives in `loader` (`from_json_str`, `from_bytes`, ...).
//! - Typed query methods live in `queries` and return structs from
//!   [`models`] that serialize to JSON for the renderer.
//! - [`names`], [`color`] and [`trend`] are free-standing pure helpers.
//! - [`boundary`] parses the GeoJSON municipality boundaries.
//!
//! # Usage
//!
//! ```rust
//! use nlgas_data::ConsumptionDataset;
//!
//! let dataset = ConsumptionDataset::from_json_str(r#"{
//!     "metadata": {"unit": "m3"},
//!     "data": [
//!         {"municipality": "A", "year": 2020, "gas_consumption": 1000},
//!         {"municipality": "B", "year": 2020, "gas_consumption": 2000},
//!         {"municipality": "A", "year": 2021, "gas_consumption": 1100}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(dataset.available_years(), vec![2021, 2020]);
//! let ranking = dataset.ranking_for_year(2020);
//! assert_eq!(ranking.get("B").map(|e| e.rank), Some(2));
//! ```

pub mod boundary;
pub mod color;
pub mod error;
mod loader;
pub mod models;
pub mod names;
mod queries;
pub mod record;
pub mod trend;

pub use boundary::{BoundaryCollection, BoundaryFeature, BoundingBox};
pub use color::{color_for_consumption, Gradient, LegendStop, Rgb};
pub use error::DataError;
pub use models::{
    ConsumptionRange, NameCollision, RankEntry, Ranking, TieBreak, YearChange, YearValue,
};
pub use names::{normalize_municipality_name, slugify, SuffixTable};
pub use record::{ConsumptionRecord, DatasetMetadata};

/// Immutable in-memory consumption dataset.
///
/// Every query recomputes its result from the records; nothing is cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionDataset {
    metadata: DatasetMetadata,
    data: Vec<ConsumptionRecord>,
    suffixes: SuffixTable,
}

impl ConsumptionDataset {
    /// Create a dataset from already validated records with the default
    /// suffix table and no metadata.
    pub fn new(data: Vec<ConsumptionRecord>) -> Self {
        Self {
            metadata: DatasetMetadata::default(),
            data,
            suffixes: SuffixTable::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: DatasetMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Replace the suffix table used to normalize names.
    pub fn with_suffixes(mut self, suffixes: SuffixTable) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn records(&self) -> &[ConsumptionRecord] {
        &self.data
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn suffixes(&self) -> &SuffixTable {
        &self.suffixes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Normalize a display name with this dataset's suffix table.
    pub fn normalize(&self, name: &str) -> String {
        self.suffixes.normalize(name)
    }
}
