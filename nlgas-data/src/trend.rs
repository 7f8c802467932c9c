//! Year-over-year and sparkline helpers for a single municipality's trend.

use crate::models::{YearChange, YearValue};
use crate::ConsumptionRecord;

/// Percent change from `previous` to `current`.
///
/// `None` when `previous` is zero or either value is not finite.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Change of each record relative to the record before it.
///
/// `history` is expected in chronological order (see
/// `ConsumptionDataset::municipality_history`). The first entry has no
/// previous year and carries `change_pct: None`.
pub fn year_over_year(history: &[ConsumptionRecord]) -> Vec<YearChange> {
    let mut changes = Vec::with_capacity(history.len());
    let mut previous: Option<f64> = None;
    for record in history {
        changes.push(YearChange {
            year: record.year,
            consumption: record.consumption,
            change_pct: previous.and_then(|p| percent_change(p, record.consumption)),
        });
        previous = Some(record.consumption);
    }
    changes
}

/// Scale a series into a `width` x `height` drawing box.
///
/// x runs from 0 (first point) to `width` (last point); y is flipped so the
/// highest value sits at 0. A flat series is drawn through the vertical
/// centre, and a single point sits at x = 0.
pub fn sparkline_points(series: &[YearValue], width: f64, height: f64) -> Vec<(f64, f64)> {
    if series.is_empty() {
        return Vec::new();
    }
    let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = series.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let step = if series.len() > 1 {
        width / (series.len() - 1) as f64
    } else {
        0.0
    };

    series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 * step;
            let y = if span > 0.0 {
                height - (p.value - min) / span * height
            } else {
                height / 2.0
            };
            (x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[(i32, f64)]) -> Vec<ConsumptionRecord> {
        values
            .iter()
            .map(|(year, v)| ConsumptionRecord::new("A", *year, *v))
            .collect()
    }

    #[test]
    fn year_over_year_first_has_no_value() {
        let changes = year_over_year(&history(&[(2020, 1000.0), (2021, 1100.0)]));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].change_pct, None);
        let second = changes[1].change_pct.unwrap();
        assert!((second - 10.0).abs() < 1e-9, "Expected +10%, got {}", second);
    }

    #[test]
    fn year_over_year_distinguishes_unchanged_from_missing() {
        let changes = year_over_year(&history(&[(2020, 1000.0), (2021, 1000.0), (2022, 900.0)]));
        assert_eq!(changes[0].change_pct, None);
        assert_eq!(changes[1].change_pct, Some(0.0));
        assert!((changes[2].change_pct.unwrap() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn year_over_year_across_gap_uses_previous_record() {
        let changes = year_over_year(&history(&[(2015, 1000.0), (2018, 1200.0)]));
        assert!((changes[1].change_pct.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn year_over_year_from_zero_is_undefined() {
        let changes = year_over_year(&history(&[(2020, 0.0), (2021, 10.0)]));
        assert_eq!(changes[1].change_pct, None);
        assert!(year_over_year(&[]).is_empty());
    }

    #[test]
    fn sparkline_scales_into_box() {
        let series = [
            YearValue { year: 2020, value: 100.0 },
            YearValue { year: 2021, value: 200.0 },
            YearValue { year: 2022, value: 150.0 },
        ];
        let points = sparkline_points(&series, 100.0, 20.0);
        assert_eq!(points, vec![(0.0, 20.0), (50.0, 0.0), (100.0, 10.0)]);
    }

    #[test]
    fn sparkline_flat_and_single() {
        let flat = [
            YearValue { year: 2020, value: 5.0 },
            YearValue { year: 2021, value: 5.0 },
        ];
        assert_eq!(sparkline_points(&flat, 10.0, 4.0), vec![(0.0, 2.0), (10.0, 2.0)]);
        let single = [YearValue { year: 2020, value: 5.0 }];
        assert_eq!(sparkline_points(&single, 10.0, 4.0), vec![(0.0, 2.0)]);
        assert!(sparkline_points(&[], 10.0, 4.0).is_empty());
    }
}
