/// Error types for loading consumption and boundary resources
use thiserror::Error;

/// Main error type for dataset loading.
///
/// Query methods never fail; only turning raw bytes into a dataset can.
#[derive(Error, Debug)]
pub enum DataError {
    /// The document is not valid JSON or does not match the expected shape
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The boundary document is not valid GeoJSON
    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Reading or decompressing the resource failed
    #[error("Failed to read resource: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but violates a structural expectation
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
