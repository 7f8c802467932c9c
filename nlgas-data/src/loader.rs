//! Parsing of the consumption resource into a [`ConsumptionDataset`].
//!
//! # Format
//!
//! ```text
//! {
//!   "metadata": { "unit": "m3/woning/jaar", ... },
//!   "data": [
//!     { "municipality": "Aa en Hunze", "year": 2015, "gas_consumption": 1650 },
//!     ...
//!   ]
//! }
//! ```
//!
//! Rows with an empty municipality, a missing or non-integer year, or a
//! consumption that is missing, non-numeric, negative or non-finite are
//! skipped and counted. A malformed row never fails the whole load.
//!
//! Resources may be gzip compressed; [`ConsumptionDataset::from_bytes`]
//! detects the gzip magic number.

use crate::error::{DataError, Result};
use crate::{ConsumptionDataset, ConsumptionRecord, DatasetMetadata, SuffixTable};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    metadata: DatasetMetadata,
    data: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    year: Value,
    #[serde(default)]
    gas_consumption: Value,
}

impl RawRecord {
    fn into_record(self) -> Option<ConsumptionRecord> {
        let municipality = self.municipality?.trim().to_string();
        if municipality.is_empty() {
            return None;
        }
        let year = match &self.year {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .and_then(|y| i32::try_from(y).ok())?;
        let consumption = match &self.gas_consumption {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite() && *v >= 0.0)?;
        Some(ConsumptionRecord {
            municipality,
            year,
            consumption,
        })
    }
}

/// Return true if `bytes` start with the gzip magic number.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompress a gzip stream into a UTF-8 string.
pub fn gunzip_to_string(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

impl ConsumptionDataset {
    /// Parse the consumption JSON document.
    ///
    /// # Example
    /// ```rust
    /// use nlgas_data::ConsumptionDataset;
    ///
    /// let dataset = ConsumptionDataset::from_json_str(
    ///     r#"{"data": [{"municipality": "Ede", "year": 2020, "gas_consumption": 1180}]}"#,
    /// ).unwrap();
    /// assert_eq!(dataset.len(), 1);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_str_with(json, SuffixTable::default())
    }

    /// Parse the consumption JSON document, normalizing names with `suffixes`.
    pub fn from_json_str_with(json: &str, suffixes: SuffixTable) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw, suffixes))
    }

    /// Parse a JSON document given as bytes, gzip compressed or not.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, SuffixTable::default())
    }

    pub fn from_bytes_with(bytes: &[u8], suffixes: SuffixTable) -> Result<Self> {
        if is_gzip(bytes) {
            return Self::from_json_str_with(&gunzip_to_string(bytes)?, suffixes);
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DataError::InvalidFormat(format!("resource is not UTF-8: {}", e)))?;
        Self::from_json_str_with(text, suffixes)
    }

    fn from_raw(raw: RawDataset, suffixes: SuffixTable) -> Self {
        let total = raw.data.len();
        let data: Vec<ConsumptionRecord> = raw
            .data
            .into_iter()
            .filter_map(RawRecord::into_record)
            .collect();
        let skipped = total - data.len();
        if skipped > 0 {
            log::warn!(
                "[nlgas] loader: skipped {} of {} records with missing or invalid fields",
                skipped,
                total
            );
        }

        let dataset = ConsumptionDataset {
            metadata: raw.metadata,
            data,
            suffixes,
        };

        if let Some(claimed) = dataset.metadata.record_count() {
            if claimed != total as u64 {
                log::warn!(
                    "[nlgas] loader: metadata claims {} records, document has {}",
                    claimed,
                    total
                );
            }
        }
        for collision in dataset.name_collisions() {
            log::warn!(
                "[nlgas] loader: {} names normalize to {:?} in {}: {:?} (last one wins)",
                collision.display_names.len(),
                collision.normalized,
                collision.year,
                collision.display_names
            );
        }
        log::info!(
            "[nlgas] loader: Loaded {} consumption records, skipped {}",
            dataset.data.len(),
            skipped
        );
        dataset
    }
}
