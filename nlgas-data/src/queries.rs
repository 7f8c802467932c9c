//! Typed query methods over a [`ConsumptionDataset`].
//!
//! Every method is a pure computation over the records. Results are built
//! fresh on each call and returned as structs from [`crate::models`].
//!
//! # Join keys
//!
//! Per-municipality results are keyed by the normalized name (see
//! [`crate::names`]), which is what the boundary features are joined on.
//! Slugs are derived from display names and only used for routing.

use crate::models::{
    ConsumptionRange, NameCollision, RankEntry, Ranking, TieBreak, YearValue,
};
use crate::names::slugify;
use crate::{ConsumptionDataset, ConsumptionRecord};
use std::collections::{BTreeMap, BTreeSet, HashSet};

impl ConsumptionDataset {
    // ───────────────────── Identity ─────────────────────

    /// Distinct display names in first-seen order.
    pub fn municipality_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.data
            .iter()
            .map(|r| r.municipality.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Find the display name whose slug equals `slug`.
    ///
    /// Names are scanned in first-seen order, so when two names share a slug
    /// the one appearing first in the dataset is returned. `None` means the
    /// municipality is unknown (e.g. a stale link). `slug` is slugified
    /// first, so links written with diacritics still resolve.
    pub fn find_municipality_by_slug(&self, slug: &str) -> Option<&str> {
        let wanted = slugify(slug);
        let found = self
            .municipality_names()
            .into_iter()
            .find(|name| slugify(name) == wanted);
        if found.is_none() {
            log::debug!("[nlgas] query: no municipality for slug {:?}", slug);
        }
        found
    }

    // ───────────────────── Per-year queries ─────────────────────

    /// Map normalized name to consumption for one year.
    ///
    /// When two records of the same year normalize to the same name the
    /// later one overwrites the earlier. A municipality without a record is
    /// simply absent from the map.
    pub fn consumption_by_year(&self, year: i32) -> BTreeMap<String, f64> {
        let mut by_name = BTreeMap::new();
        for record in self.data.iter().filter(|r| r.year == year) {
            let key = self.suffixes.normalize(&record.municipality);
            if let Some(previous) = by_name.insert(key, record.consumption) {
                log::debug!(
                    "[nlgas] query: {:?} overwrites earlier value {} in {}",
                    record.municipality,
                    previous,
                    year
                );
            }
        }
        log::debug!(
            "[nlgas] query: consumption_by_year({}) returned {} municipalities",
            year,
            by_name.len()
        );
        by_name
    }

    /// Distinct years present, most recent first. Gaps are preserved.
    pub fn available_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.data.iter().map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.data.iter().map(|r| r.year).max()
    }

    /// Number of records per year, ascending by year.
    pub fn record_counts_by_year(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.data {
            *counts.entry(record.year).or_insert(0) += 1;
        }
        counts
    }

    /// Global extrema across all years and municipalities.
    ///
    /// An empty dataset returns [`ConsumptionRange::EMPTY`]
    /// (`min = +inf`, `max = -inf`).
    pub fn consumption_range(&self) -> ConsumptionRange {
        ConsumptionRange::from_values(self.data.iter().map(|r| r.consumption))
    }

    /// Extrema restricted to one year.
    pub fn consumption_range_for_year(&self, year: i32) -> ConsumptionRange {
        ConsumptionRange::from_values(
            self.data
                .iter()
                .filter(|r| r.year == year)
                .map(|r| r.consumption),
        )
    }

    // ───────────────────── National aggregates ─────────────────────

    /// Arithmetic mean of all records per year, ascending by year.
    ///
    /// Means are rounded with [`f64::round`], i.e. halves round away from
    /// zero (1500.5 becomes 1501).
    pub fn national_averages(&self) -> Vec<YearValue> {
        let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for record in &self.data {
            let entry = sums.entry(record.year).or_insert((0.0, 0));
            entry.0 += record.consumption;
            entry.1 += 1;
        }
        let averages: Vec<YearValue> = sums
            .into_iter()
            .map(|(year, (total, count))| YearValue {
                year,
                value: (total / count as f64).round(),
            })
            .collect();
        log::debug!(
            "[nlgas] query: national_averages returned {} years",
            averages.len()
        );
        averages
    }

    /// Rounded national average for a single year, if it has records.
    pub fn national_average(&self, year: i32) -> Option<f64> {
        let (total, count) = self
            .data
            .iter()
            .filter(|r| r.year == year)
            .fold((0.0, 0usize), |(total, count), r| {
                (total + r.consumption, count + 1)
            });
        (count > 0).then(|| (total / count as f64).round())
    }

    // ───────────────────── Rankings ─────────────────────

    /// Rank every record of `year` by ascending consumption.
    ///
    /// Rank 1 is the lowest consumer. Equal values keep dataset order.
    pub fn ranking_for_year(&self, year: i32) -> Ranking {
        self.ranking_for_year_with(year, TieBreak::InputOrder)
    }

    /// Rank every record of `year` with an explicit tie-break rule.
    ///
    /// Ranks are 1..=N without gaps or duplicates, where N is the number of
    /// records in that year.
    pub fn ranking_for_year_with(&self, year: i32, tie_break: TieBreak) -> Ranking {
        let mut rows: Vec<(String, usize, &ConsumptionRecord)> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, r)| r.year == year)
            .map(|(index, r)| (self.suffixes.normalize(&r.municipality), index, r))
            .collect();

        match tie_break {
            TieBreak::InputOrder => {
                rows.sort_by(|a, b| a.2.consumption.total_cmp(&b.2.consumption));
            }
            TieBreak::Alphabetical => {
                rows.sort_by(|a, b| {
                    a.2.consumption
                        .total_cmp(&b.2.consumption)
                        .then_with(|| a.0.cmp(&b.0))
                });
            }
        }

        let total = rows.len();
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, (name, record_index, record))| RankEntry {
                name,
                municipality: record.municipality.clone(),
                consumption: record.consumption,
                rank: i + 1,
                total,
                record_index,
            })
            .collect();
        log::debug!(
            "[nlgas] query: ranking_for_year({}) ranked {} municipalities",
            year,
            total
        );
        Ranking { year, entries }
    }

    // ───────────────────── Per-municipality ─────────────────────

    /// All records of one municipality, sorted chronologically.
    ///
    /// `name` may be a display name or a normalized name; both sides are
    /// normalized before comparing.
    pub fn municipality_history(&self, name: &str) -> Vec<ConsumptionRecord> {
        let key = self.suffixes.normalize(name);
        let mut history: Vec<ConsumptionRecord> = self
            .data
            .iter()
            .filter(|r| self.suffixes.normalize(&r.municipality) == key)
            .cloned()
            .collect();
        history.sort_by_key(|r| r.year);
        history
    }

    // ───────────────────── Diagnostics ─────────────────────

    /// Records of the same year that normalize to the same name.
    ///
    /// `consumption_by_year` silently keeps only the last of these; this
    /// lists them so ingestion can report the loss.
    pub fn name_collisions(&self) -> Vec<NameCollision> {
        let mut groups: BTreeMap<(i32, String), Vec<String>> = BTreeMap::new();
        for record in &self.data {
            groups
                .entry((record.year, self.suffixes.normalize(&record.municipality)))
                .or_default()
                .push(record.municipality.clone());
        }
        groups
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|((year, normalized), display_names)| NameCollision {
                year,
                normalized,
                display_names,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::TieBreak;
    use crate::{ConsumptionDataset, ConsumptionRecord};

    /// The three-record scenario used throughout the docs.
    fn example_dataset() -> ConsumptionDataset {
        ConsumptionDataset::new(vec![
            ConsumptionRecord::new("A", 2020, 1000.0),
            ConsumptionRecord::new("B", 2020, 2000.0),
            ConsumptionRecord::new("A", 2021, 1100.0),
        ])
    }

    /// Helper with disambiguated names and a gap year.
    fn sample_dataset() -> ConsumptionDataset {
        ConsumptionDataset::new(vec![
            ConsumptionRecord::new("Hengelo (Gelderland)", 2015, 1500.0),
            ConsumptionRecord::new("Súdwest-Fryslân", 2015, 1300.0),
            ConsumptionRecord::new("'s-Hertogenbosch", 2015, 1250.0),
            ConsumptionRecord::new("Hengelo (Gelderland)", 2017, 1400.0),
            ConsumptionRecord::new("Súdwest-Fryslân", 2017, 1200.0),
            ConsumptionRecord::new("'s-Hertogenbosch", 2017, 1200.0),
            ConsumptionRecord::new("Hengelo (Gelderland)", 2016, 1450.0),
        ])
    }

    #[test]
    fn example_available_years() {
        assert_eq!(example_dataset().available_years(), vec![2021, 2020]);
    }

    #[test]
    fn example_consumption_by_year() {
        let by_year = example_dataset().consumption_by_year(2020);
        assert_eq!(by_year.len(), 2);
        assert_eq!(by_year.get("A"), Some(&1000.0));
        assert_eq!(by_year.get("B"), Some(&2000.0));
    }

    #[test]
    fn example_ranking() {
        let ranking = example_dataset().ranking_for_year(2020);
        let a = ranking.get("A").unwrap();
        let b = ranking.get("B").unwrap();
        assert_eq!((a.rank, a.total), (1, 2));
        assert_eq!((b.rank, b.total), (2, 2));
    }

    #[test]
    fn example_national_average() {
        let averages = example_dataset().national_averages();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].year, 2020);
        assert_eq!(averages[0].value, 1500.0);
        assert_eq!(averages[1].year, 2021);
        assert_eq!(averages[1].value, 1100.0);
    }

    #[test]
    fn national_average_rounds_half_away_from_zero() {
        let dataset = ConsumptionDataset::new(vec![
            ConsumptionRecord::new("A", 2020, 1000.0),
            ConsumptionRecord::new("B", 2020, 2001.0),
            ConsumptionRecord::new("A", 2021, 1000.0),
            ConsumptionRecord::new("B", 2021, 1000.8),
        ]);
        let averages = dataset.national_averages();
        // (1000 + 2001) / 2 = 1500.5
        assert_eq!(averages[0].value, 1501.0);
        // (1000 + 1000.8) / 2 = 1000.4
        assert_eq!(averages[1].value, 1000.0);
        assert_eq!(dataset.national_average(2020), Some(1501.0));
        assert_eq!(dataset.national_average(1999), None);
    }

    #[test]
    fn available_years_preserve_gaps() {
        let dataset = ConsumptionDataset::new(vec![
            ConsumptionRecord::new("A", 2015, 1.0),
            ConsumptionRecord::new("A", 2024, 1.0),
            ConsumptionRecord::new("B", 2019, 1.0),
            ConsumptionRecord::new("B", 2015, 1.0),
        ]);
        assert_eq!(dataset.available_years(), vec![2024, 2019, 2015]);
        assert_eq!(dataset.latest_year(), Some(2024));
        assert!(ConsumptionDataset::default().available_years().is_empty());
        assert_eq!(ConsumptionDataset::default().latest_year(), None);
    }

    #[test]
    fn consumption_by_year_normalizes_names() {
        let by_year = sample_dataset().consumption_by_year(2015);
        assert_eq!(by_year.get("Hengelo"), Some(&1500.0));
        assert!(by_year.get("Hengelo (Gelderland)").is_none());
        assert!(sample_dataset().consumption_by_year(1990).is_empty());
    }

    #[test]
    fn consumption_by_year_last_write_wins() {
        let dataset = ConsumptionDataset::new(vec![
            ConsumptionRecord::new("Bergen (Limburg)", 2020, 900.0),
            ConsumptionRecord::new("Bergen", 2020, 1300.0),
        ]);
        let by_year = dataset.consumption_by_year(2020);
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year.get("Bergen"), Some(&1300.0));

        let ranking = dataset.ranking_for_year(2020);
        let bergen = ranking.get("Bergen").unwrap();
        assert_eq!(bergen.consumption, 1300.0);
        assert_eq!(bergen.rank, 2);

        let collisions = dataset.name_collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].normalized, "Bergen");
        assert_eq!(
            collisions[0].display_names,
            vec!["Bergen (Limburg)".to_string(), "Bergen".to_string()]
        );
    }

    #[test]
    fn ranking_lookup_agrees_with_consumption_by_year() {
        let dataset = ConsumptionDataset::new(vec![
            ConsumptionRecord::new("Bergen (Limburg)", 2020, 1300.0),
            ConsumptionRecord::new("Bergen", 2020, 900.0),
        ]);
        let by_year = dataset.consumption_by_year(2020);
        assert_eq!(by_year.get("Bergen"), Some(&900.0));

        for tie_break in [TieBreak::InputOrder, TieBreak::Alphabetical] {
            let ranking = dataset.ranking_for_year_with(2020, tie_break);
            let bergen = ranking.get("Bergen").unwrap();
            assert_eq!(bergen.consumption, 900.0);
            assert_eq!(bergen.municipality, "Bergen");
            assert_eq!((bergen.rank, bergen.record_index), (1, 1));
        }
    }

    #[test]
    fn no_collisions_across_years() {
        assert!(sample_dataset().name_collisions().is_empty());
    }

    #[test]
    fn consumption_range_bounds_every_value() {
        let dataset = sample_dataset();
        let range = dataset.consumption_range();
        assert_eq!(range.min, 1200.0);
        assert_eq!(range.max, 1500.0);
        for record in dataset.records() {
            assert!(range.contains(record.consumption));
        }

        let range_2017 = dataset.consumption_range_for_year(2017);
        assert_eq!((range_2017.min, range_2017.max), (1200.0, 1400.0));
    }

    #[test]
    fn consumption_range_of_empty_dataset() {
        let range = ConsumptionDataset::default().consumption_range();
        assert_eq!(range.min, f64::INFINITY);
        assert_eq!(range.max, f64::NEG_INFINITY);
        assert!(range.is_empty());
    }

    #[test]
    fn ranking_is_contiguous_per_year() {
        let dataset = sample_dataset();
        let counts = dataset.record_counts_by_year();
        for year in dataset.available_years() {
            let ranking = dataset.ranking_for_year(year);
            let n = counts[&year];
            assert_eq!(ranking.len(), n);
            let ranks: Vec<usize> = ranking.entries.iter().map(|e| e.rank).collect();
            assert_eq!(ranks, (1..=n).collect::<Vec<_>>());
            assert!(ranking.entries.iter().all(|e| e.total == n));
            assert!(ranking
                .entries
                .windows(2)
                .all(|w| w[0].consumption <= w[1].consumption));
        }
    }

    #[test]
    fn ranking_ties_keep_input_order() {
        // 2017: Súdwest-Fryslân and 's-Hertogenbosch both at 1200
        let ranking = sample_dataset().ranking_for_year(2017);
        assert_eq!(ranking.entries[0].name, "Súdwest-Fryslân");
        assert_eq!(ranking.entries[1].name, "'s-Hertogenbosch");
        assert_eq!(ranking.entries[2].name, "Hengelo");
    }

    #[test]
    fn ranking_ties_alphabetical() {
        let ranking = sample_dataset().ranking_for_year_with(2017, TieBreak::Alphabetical);
        assert_eq!(ranking.entries[0].name, "'s-Hertogenbosch");
        assert_eq!(ranking.entries[1].name, "Súdwest-Fryslân");
    }

    #[test]
    fn ranking_of_missing_year_is_empty() {
        let ranking = sample_dataset().ranking_for_year(2030);
        assert!(ranking.is_empty());
        assert_eq!(ranking.year, 2030);
    }

    #[test]
    fn find_by_slug() {
        let dataset = sample_dataset();
        assert_eq!(
            dataset.find_municipality_by_slug("hengelo-gelderland"),
            Some("Hengelo (Gelderland)")
        );
        assert_eq!(
            dataset.find_municipality_by_slug("s-hertogenbosch"),
            Some("'s-Hertogenbosch")
        );
        assert_eq!(
            dataset.find_municipality_by_slug("sudwest-fryslan"),
            Some("Súdwest-Fryslân")
        );
        assert_eq!(
            dataset.find_municipality_by_slug("súdwest-fryslân"),
            Some("Súdwest-Fryslân")
        );
        assert_eq!(dataset.find_municipality_by_slug("atlantis"), None);
    }

    #[test]
    fn find_by_slug_collision_returns_first_seen() {
        let dataset = ConsumptionDataset::new(vec![
            ConsumptionRecord::new("Den-Haag", 2020, 1.0),
            ConsumptionRecord::new("Den Haag", 2020, 2.0),
        ]);
        assert_eq!(dataset.find_municipality_by_slug("den-haag"), Some("Den-Haag"));
    }

    #[test]
    fn municipality_names_first_seen_order() {
        let dataset = sample_dataset();
        let names = dataset.municipality_names();
        assert_eq!(
            names,
            vec!["Hengelo (Gelderland)", "Súdwest-Fryslân", "'s-Hertogenbosch"]
        );
    }

    #[test]
    fn history_is_sorted_and_matches_normalized_name() {
        let dataset = sample_dataset();
        let history = dataset.municipality_history("Hengelo");
        let years: Vec<i32> = history.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2015, 2016, 2017]);
        assert_eq!(dataset.municipality_history("Hengelo (Gelderland)"), history);
        assert!(dataset.municipality_history("Atlantis").is_empty());
    }
}
