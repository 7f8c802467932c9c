//! Text and JSON rendering of the dataset queries.
//!
//! Every function returns the full output as a string; `run` prints it.

use nlgas_data::{ConsumptionDataset, NameCollision, Ranking, TieBreak};
use nlgas_utils::numbers::{format_change, format_consumption};
use nlgas_views::{DetailView, HomeView};
use std::fmt::Write;

fn unit(dataset: &ConsumptionDataset) -> Option<&str> {
    dataset.metadata().unit()
}

/// Available years, newest first, with their record counts.
pub fn render_years(dataset: &ConsumptionDataset) -> anyhow::Result<String> {
    let counts = dataset.record_counts_by_year();
    let mut out = String::new();
    for year in dataset.available_years() {
        let count = counts.get(&year).copied().unwrap_or(0);
        writeln!(out, "{}  {:>4} records", year, count)?;
    }
    if out.is_empty() {
        writeln!(out, "The dataset contains no records.")?;
    }
    Ok(out)
}

pub fn run_summary(dataset: &ConsumptionDataset, top: usize, json: bool) -> anyhow::Result<String> {
    let home = HomeView::build(dataset, top);
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&home)?));
    }
    render_summary(&home)
}

pub fn render_summary(home: &HomeView) -> anyhow::Result<String> {
    let mut out = String::new();
    let Some(latest) = home.latest_year else {
        writeln!(out, "The dataset contains no records.")?;
        return Ok(out);
    };
    let unit = home.unit.as_deref();

    writeln!(
        out,
        "{} municipalities, {} records, latest year {}",
        home.municipality_count, home.record_count, latest
    )?;
    writeln!(out, "\nNational average")?;
    for point in &home.national_trend {
        writeln!(out, "  {}  {}", point.year, format_consumption(Some(point.value), unit))?;
    }
    if let (Some(first), Some(last)) = (home.national_trend.first(), home.national_trend.last()) {
        writeln!(
            out,
            "  {}-{}: {}",
            first.year,
            last.year,
            format_change(home.national_change_pct)
        )?;
    }

    writeln!(out, "\nLowest consumers {}", latest)?;
    for entry in &home.lowest {
        writeln!(
            out,
            "  {:>3}. {}  {}",
            entry.rank,
            entry.municipality,
            format_consumption(Some(entry.consumption), unit)
        )?;
    }
    writeln!(out, "\nHighest consumers {}", latest)?;
    for entry in &home.highest {
        writeln!(
            out,
            "  {:>3}. {}  {}",
            entry.rank,
            entry.municipality,
            format_consumption(Some(entry.consumption), unit)
        )?;
    }
    Ok(out)
}

pub fn run_ranking(
    dataset: &ConsumptionDataset,
    year: i32,
    tie_break: TieBreak,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<String> {
    let mut ranking = dataset.ranking_for_year_with(year, tie_break);
    if let Some(limit) = limit {
        ranking.entries.truncate(limit);
    }
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&ranking)?));
    }
    render_ranking(&ranking, unit(dataset))
}

pub fn render_ranking(ranking: &Ranking, unit: Option<&str>) -> anyhow::Result<String> {
    let mut out = String::new();
    if ranking.is_empty() {
        writeln!(out, "No records for {}.", ranking.year)?;
        return Ok(out);
    }
    for entry in &ranking.entries {
        writeln!(
            out,
            "{:>3}/{}  {}  {}",
            entry.rank,
            entry.total,
            entry.municipality,
            format_consumption(Some(entry.consumption), unit)
        )?;
    }
    Ok(out)
}

pub fn run_municipality(dataset: &ConsumptionDataset, slug: &str, json: bool) -> anyhow::Result<String> {
    let Some(detail) = DetailView::build(dataset, slug) else {
        log::info!("[nlgas] query: no municipality for slug {:?}", slug);
        return Ok(format!("Municipality not found: {}\n", slug));
    };
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&detail)?));
    }
    render_detail(&detail, unit(dataset))
}

pub fn render_detail(detail: &DetailView, unit: Option<&str>) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "{} ({})", detail.municipality, detail.slug)?;
    for year in &detail.years {
        let rank = match (year.rank, year.total) {
            (Some(rank), Some(total)) => format!("{}/{}", rank, total),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "  {}  {:>14}  {:>8}  rank {:>9}  vs national {}",
            year.year,
            format_consumption(Some(year.consumption), unit),
            format_change(year.change_pct),
            rank,
            format_change(year.vs_national_pct)
        )?;
    }
    writeln!(out, "  total change: {}", format_change(detail.total_change_pct))?;
    Ok(out)
}

pub fn render_collisions(collisions: &[NameCollision]) -> anyhow::Result<String> {
    let mut out = String::new();
    if collisions.is_empty() {
        writeln!(out, "No name collisions.")?;
        return Ok(out);
    }
    for collision in collisions {
        writeln!(
            out,
            "{}  {:?} <- {}",
            collision.year,
            collision.normalized,
            collision.display_names.join(", ")
        )?;
    }
    writeln!(
        out,
        "{} collisions; only the last record of each is used.",
        collisions.len()
    )?;
    Ok(out)
}
