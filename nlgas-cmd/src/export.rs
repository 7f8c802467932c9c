//! Choropleth export to CSV or JSON.

use anyhow::{bail, Context};
use nlgas_data::{BoundaryCollection, ConsumptionDataset, Gradient};
use nlgas_views::{MapView, ViewState};
use serde::Serialize;
use std::io;
use std::path::Path;

/// One CSV row per boundary feature.
#[derive(Debug, Serialize)]
struct ChoroplethRow<'a> {
    name: &'a str,
    statcode: Option<&'a str>,
    slug: &'a str,
    year: i32,
    consumption: Option<f64>,
    rank: Option<usize>,
    total: Option<usize>,
    color: String,
}

/// Map for `year`, or the latest year when it is absent or not in the data.
///
/// `None` for an empty dataset.
pub fn build_map(
    dataset: &ConsumptionDataset,
    boundaries: &BoundaryCollection,
    year: Option<i32>,
    gradient: &Gradient,
) -> Option<MapView> {
    let mut state = ViewState::new();
    if let Some(year) = year {
        state.select_year(year);
    }
    MapView::for_state(dataset, boundaries, &state, gradient)
}

pub fn write_choropleth_csv<W: io::Write>(map: &MapView, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for feature in &map.features {
        wtr.serialize(ChoroplethRow {
            name: &feature.name,
            statcode: feature.statcode.as_deref(),
            slug: &feature.slug,
            year: map.year,
            consumption: feature.consumption,
            rank: feature.rank,
            total: feature.total,
            color: feature.color.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `map` to `output`; the extension picks the format.
pub fn write_choropleth(map: &MapView, output: &str) -> anyhow::Result<()> {
    let path = Path::new(output);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", output))?;
            write_choropleth_csv(map, file)?;
        }
        Some("json") => {
            let json = serde_json::to_string_pretty(map)?;
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", output))?;
        }
        _ => bail!("Unsupported output format for {} (use .csv or .json)", output),
    }
    log::info!(
        "[nlgas] export: {} features for {} written to {}",
        map.features.len(),
        map.year,
        output
    );
    Ok(())
}
