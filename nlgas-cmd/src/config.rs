//! Optional JSON settings file.
//!
//! ```json
//! {
//!   "suffixes": [" (Gelderland)", " (O.)", " (L.)"],
//!   "gradient": {"low": "#fff5eb", "high": "#7f2704", "no_data": "#e0e0e0"}
//! }
//! ```
//!
//! Both keys are optional; missing ones keep their defaults.

use anyhow::Context;
use nlgas_data::{Gradient, SuffixTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Disambiguation suffixes stripped when building join keys.
    pub suffixes: SuffixTable,
    /// Choropleth colors.
    pub gradient: Gradient,
}

impl Settings {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `path`, or use the defaults when no path is given.
    pub async fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path))?;
        let settings = Self::from_json_str(&text)
            .with_context(|| format!("Invalid config {}", path))?;
        log::info!(
            "[nlgas] config: {} suffixes from {}",
            settings.suffixes.suffixes().len(),
            path
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlgas_data::Rgb;

    #[test]
    fn empty_object_keeps_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.suffixes.normalize("Hengelo (Gelderland)"), "Hengelo");
    }

    #[test]
    fn custom_suffixes_and_colors() {
        let settings = Settings::from_json_str(
            r##"{
                "suffixes": [" (Zeeland)"],
                "gradient": {"low": "#ffffff", "high": "#000000", "no_data": "#cccccc"}
            }"##,
        )
        .unwrap();
        assert_eq!(settings.suffixes.normalize("Middelburg (Zeeland)"), "Middelburg");
        assert_eq!(
            settings.suffixes.normalize("Hengelo (Gelderland)"),
            "Hengelo (Gelderland)"
        );
        assert_eq!(settings.gradient.no_data, Rgb::new(0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn bad_color_is_an_error() {
        let result = Settings::from_json_str(
            r##"{"gradient": {"low": "white", "high": "#000000", "no_data": "#cccccc"}}"##,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_path_uses_defaults() {
        assert_eq!(Settings::load(None).await.unwrap(), Settings::default());
        assert!(Settings::load(Some("/nonexistent/nlgas.json")).await.is_err());
    }
}
