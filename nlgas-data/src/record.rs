use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Gas consumption of one municipality in one year.
///
/// `consumption` is the average consumption per dwelling in m³ per year.
/// The JSON resource calls this field `gas_consumption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// Display name, possibly disambiguated ("Hengelo (Gelderland)").
    pub municipality: String,
    pub year: i32,
    #[serde(rename = "gas_consumption")]
    pub consumption: f64,
}

impl ConsumptionRecord {
    pub fn new(municipality: impl Into<String>, year: i32, consumption: f64) -> Self {
        Self {
            municipality: municipality.into(),
            year,
            consumption,
        }
    }
}

/// Descriptive metadata shipped alongside the records.
///
/// Nothing in the query layer reads it; it is kept verbatim so it can be
/// displayed or re-exported. Accessors understand the common keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetMetadata(pub Map<String, Value>);

impl DatasetMetadata {
    /// Unit of the consumption values, e.g. "m³/woning/jaar".
    pub fn unit(&self) -> Option<&str> {
        self.0.get("unit").and_then(Value::as_str)
    }

    /// Number of records the producer claims to have written.
    pub fn record_count(&self) -> Option<u64> {
        ["record_count", "total_records", "records"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_u64))
    }

    pub fn source(&self) -> Option<&str> {
        self.0.get("source").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
