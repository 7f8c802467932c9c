//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be handed to a map or chart
//! renderer as JSON.

use serde::{Deserialize, Serialize};

/// A single (year, value) pair, e.g. the national average for one year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Global extrema of the consumption values.
///
/// An empty dataset yields `{ min: +inf, max: -inf }`; check
/// [`is_empty`](Self::is_empty) before using the bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ConsumptionRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ConsumptionRange {
    /// Identity of the min/max fold.
    pub const EMPTY: ConsumptionRange = ConsumptionRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Single pass over `values`.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        values.into_iter().fold(Self::EMPTY, |range, v| ConsumptionRange {
            min: range.min.min(v),
            max: range.max.max(v),
        })
    }

    /// True when no value was folded in.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// True when the range has zero width (all values equal).
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }
}

/// How equal consumption values are ordered in a [`Ranking`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep dataset order among equal values (stable sort).
    #[default]
    InputOrder,
    /// Order equal values by normalized name.
    Alphabetical,
}

/// Position of one municipality within a single year's ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankEntry {
    /// Normalized municipality name (join key).
    pub name: String,
    /// Display name as it appears in the dataset.
    pub municipality: String,
    pub consumption: f64,
    /// 1-based; rank 1 is the lowest consumer.
    pub rank: usize,
    /// Number of records ranked in this year.
    pub total: usize,
    /// Position of the source record in the dataset.
    pub record_index: usize,
}

impl RankEntry {
    /// Share of municipalities (in percent) at or below this rank.
    pub fn percentile(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.rank as f64 / self.total as f64 * 100.0
    }
}

/// Ascending consumption order of all municipalities for one year.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ranking {
    pub year: i32,
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    /// Look up a municipality by normalized name.
    ///
    /// If several records share the name, the one latest in the dataset
    /// wins, matching the overwrite rule of `consumption_by_year`.
    pub fn get(&self, name: &str) -> Option<&RankEntry> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .max_by_key(|e| e.record_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` lowest consumers, lowest first.
    pub fn lowest(&self, n: usize) -> &[RankEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` highest consumers, highest first.
    pub fn highest(&self, n: usize) -> Vec<&RankEntry> {
        self.entries.iter().rev().take(n).collect()
    }
}

/// One step of a municipality's trend with the change from the year before.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearChange {
    pub year: i32,
    pub consumption: f64,
    /// Percent change from the previous record. `None` for the first record
    /// of a series (and when the previous value was zero), never `0.0`.
    pub change_pct: Option<f64>,
}

/// Records from one year whose names normalize to the same key.
///
/// `consumption_by_year` keeps only the last of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameCollision {
    pub year: i32,
    pub normalized: String,
    pub display_names: Vec<String>,
}
