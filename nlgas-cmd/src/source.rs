//! Fetching the two static resources from disk or over HTTP.

use crate::config::Settings;
use anyhow::Context;
use nlgas_data::{BoundaryCollection, ConsumptionDataset};
use std::path::PathBuf;
use std::time::Duration;

/// Where a resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }

    /// Raw bytes of the resource, still compressed if it was stored that way.
    pub async fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Source::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            Source::Url(url) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(60))
                    .build()?;
                let response = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch {}", url))?
                    .error_for_status()
                    .with_context(|| format!("Bad response for {}", url))?;
                let body = response.bytes().await?;
                Ok(body.to_vec())
            }
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

pub async fn load_dataset(location: &str, settings: &Settings) -> anyhow::Result<ConsumptionDataset> {
    let source = Source::parse(location);
    log::info!("[nlgas] source: loading consumption data from {}", source);
    let bytes = source.read_bytes().await?;
    ConsumptionDataset::from_bytes_with(&bytes, settings.suffixes.clone())
        .with_context(|| format!("Failed to load consumption data from {}", source))
}

pub async fn load_boundaries(location: &str) -> anyhow::Result<BoundaryCollection> {
    let source = Source::parse(location);
    log::info!("[nlgas] source: loading boundaries from {}", source);
    let bytes = source.read_bytes().await?;
    BoundaryCollection::from_bytes(&bytes)
        .with_context(|| format!("Failed to load boundaries from {}", source))
}

/// Load both resources concurrently; either failure aborts the pair.
pub async fn load_all(
    data: &str,
    boundaries: &str,
    settings: &Settings,
) -> anyhow::Result<(ConsumptionDataset, BoundaryCollection)> {
    tokio::try_join!(load_dataset(data, settings), load_boundaries(boundaries))
}
