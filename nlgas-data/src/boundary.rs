//! Municipality boundaries from the CBS GeoJSON resource.
//!
//! The document is parsed with the `geojson` crate. Each feature carries
//! `properties.statnaam`, the display name joined against the consumption
//! records after normalization. Any geometry type is accepted; features
//! whose name is missing keep an empty name and simply never join.

use crate::error::{DataError, Result};
use crate::loader::{gunzip_to_string, is_gzip};
use crate::names::SuffixTable;
use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

impl From<geo::Rect<f64>> for BoundingBox {
    fn from(rect: geo::Rect<f64>) -> Self {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// One municipality feature.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    name: String,
    feature: Feature,
}

impl BoundaryFeature {
    pub fn new(feature: Feature) -> Self {
        let name = feature
            .property("statnaam")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { name, feature }
    }

    /// `statnaam`, or an empty string when the feature has none.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// CBS municipality code, e.g. "GM0363".
    pub fn statcode(&self) -> Option<&str> {
        self.property("statcode").and_then(Value::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.feature.property(key)
    }

    pub fn geometry(&self) -> Option<&geojson::Geometry> {
        self.feature.geometry.as_ref()
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Extent of the geometry; `None` without a geometry or for an empty one.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let geometry = self.geometry()?;
        let geometry = geo::Geometry::<f64>::try_from(&geometry.value).ok()?;
        geometry.bounding_rect().map(BoundingBox::from)
    }
}

impl Serialize for BoundaryFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.feature.serialize(serializer)
    }
}

/// The boundary FeatureCollection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    /// Parse a GeoJSON FeatureCollection.
    ///
    /// # Example
    /// ```rust
    /// use nlgas_data::BoundaryCollection;
    ///
    /// let boundaries = BoundaryCollection::from_geojson_str(r#"{
    ///     "type": "FeatureCollection",
    ///     "features": [{
    ///         "type": "Feature",
    ///         "properties": {"statnaam": "Ede"},
    ///         "geometry": {"type": "Polygon", "coordinates": [[[5.6, 52.0], [5.7, 52.1], [5.6, 52.1], [5.6, 52.0]]]}
    ///     }]
    /// }"#).unwrap();
    /// assert_eq!(boundaries.names(), vec!["Ede"]);
    /// ```
    pub fn from_geojson_str(json: &str) -> Result<Self> {
        let collection = match json.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Feature(_) => {
                return Err(DataError::InvalidFormat(
                    "expected a FeatureCollection, found a Feature".to_string(),
                ))
            }
            GeoJson::Geometry(_) => {
                return Err(DataError::InvalidFormat(
                    "expected a FeatureCollection, found a Geometry".to_string(),
                ))
            }
        };
        let boundaries = Self::from(collection);

        let without_name = boundaries.features.iter().filter(|f| f.name().is_empty()).count();
        if without_name > 0 {
            log::warn!(
                "[nlgas] loader: {} boundary features have no statnaam",
                without_name
            );
        }
        let without_geometry = boundaries
            .features
            .iter()
            .filter(|f| f.geometry().is_none())
            .count();
        if without_geometry > 0 {
            log::warn!(
                "[nlgas] loader: {} boundary features have no geometry",
                without_geometry
            );
        }
        log::info!(
            "[nlgas] loader: Loaded {} boundary features",
            boundaries.features.len()
        );
        Ok(boundaries)
    }

    /// Parse GeoJSON given as bytes, gzip compressed or not.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if is_gzip(bytes) {
            return Self::from_geojson_str(&gunzip_to_string(bytes)?);
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DataError::InvalidFormat(format!("resource is not UTF-8: {}", e)))?;
        Self::from_geojson_str(text)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(BoundaryFeature::name).collect()
    }

    /// First feature whose `statnaam` normalizes to `normalized`.
    pub fn find(&self, suffixes: &SuffixTable, normalized: &str) -> Option<&BoundaryFeature> {
        self.features
            .iter()
            .find(|f| suffixes.normalize(f.name()) == normalized)
    }

    /// Bounding box over all features with a geometry.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.features
            .iter()
            .filter_map(BoundaryFeature::bounds)
            .reduce(BoundingBox::union)
    }

    pub fn to_geojson_string(&self) -> String {
        let collection: FeatureCollection = self
            .features
            .iter()
            .map(|f| f.feature.clone())
            .collect();
        GeoJson::from(collection).to_string()
    }
}

impl From<FeatureCollection> for BoundaryCollection {
    fn from(collection: FeatureCollection) -> Self {
        Self {
            features: collection.features.into_iter().map(BoundaryFeature::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"statnaam": "Hengelo", "statcode": "GM0164", "jrstatcode": "2020GM0164"},
                "geometry": {"type": "Polygon", "coordinates": [[[6.7, 52.2], [6.9, 52.2], [6.9, 52.3], [6.7, 52.2]]]}
            },
            {
                "type": "Feature",
                "properties": {"statnaam": "Súdwest-Fryslân"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[5.3, 52.9, 0.0], [5.6, 52.9, 0.0], [5.6, 53.1, 0.0], [5.3, 52.9, 0.0]]],
                    [[[5.2, 53.0], [5.25, 53.0], [5.25, 53.05], [5.2, 53.0]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"statnaam": "Nergens"},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn load_boundaries() {
        let boundaries = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(boundaries.len(), 3);
        assert_eq!(boundaries.names(), vec!["Hengelo", "Súdwest-Fryslân", "Nergens"]);

        let hengelo = &boundaries.features[0];
        assert_eq!(hengelo.statcode(), Some("GM0164"));
        assert_eq!(
            hengelo.property("jrstatcode").and_then(Value::as_str),
            Some("2020GM0164")
        );
        assert!(matches!(
            hengelo.geometry().map(|g| &g.value),
            Some(geojson::Value::Polygon(_))
        ));
        assert!(boundaries.features[2].geometry().is_none());
    }

    #[test]
    fn feature_bounds() {
        let boundaries = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(
            boundaries.features[0].bounds(),
            Some(BoundingBox::new(6.7, 52.2, 6.9, 52.3))
        );
        assert_eq!(
            boundaries.features[1].bounds(),
            Some(BoundingBox::new(5.2, 52.9, 5.6, 53.1))
        );
        assert_eq!(boundaries.features[2].bounds(), None);
        assert_eq!(
            boundaries.bounds(),
            Some(BoundingBox::new(5.2, 52.2, 6.9, 53.1))
        );
    }

    #[test]
    fn find_by_normalized_name() {
        let boundaries = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        let table = SuffixTable::default();
        let found = boundaries.find(&table, &table.normalize("Hengelo (Gelderland)"));
        assert_eq!(found.map(BoundaryFeature::name), Some("Hengelo"));
        assert!(boundaries.find(&table, "Atlantis").is_none());
    }

    #[test]
    fn reject_non_collection() {
        let result =
            BoundaryCollection::from_geojson_str(r#"{"type": "Point", "coordinates": [5.0, 52.0]}"#);
        assert!(matches!(result, Err(DataError::InvalidFormat(_))));
        assert!(matches!(
            BoundaryCollection::from_geojson_str("not json"),
            Err(DataError::GeoJson(_))
        ));
    }

    #[test]
    fn mixed_geometries_load() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"statnaam": "Ede"},
             "geometry": {"type": "Polygon", "coordinates": [[[5.6, 52.0], [5.8, 52.0], [5.8, 52.1], [5.6, 52.0]]]}},
            {"type": "Feature", "properties": {"statnaam": "Centroid"},
             "geometry": {"type": "Point", "coordinates": [5.0, 52.5]}},
            {"type": "Feature", "properties": {"statnaam": "Mixed"},
             "geometry": {"type": "GeometryCollection", "geometries": [
                 {"type": "Point", "coordinates": [4.0, 51.0]},
                 {"type": "LineString", "coordinates": [[4.0, 51.0], [4.5, 51.5]]}
             ]}},
            {"type": "Feature", "properties": {"statcode": "GM0000"},
             "geometry": {"type": "Point", "coordinates": [6.0, 53.0]}}
        ]}"#;
        let boundaries = BoundaryCollection::from_geojson_str(json).unwrap();
        assert_eq!(boundaries.names(), vec!["Ede", "Centroid", "Mixed", ""]);
        assert_eq!(
            boundaries.features[1].bounds(),
            Some(BoundingBox::new(5.0, 52.5, 5.0, 52.5))
        );
        assert_eq!(
            boundaries.features[2].bounds(),
            Some(BoundingBox::new(4.0, 51.0, 4.5, 51.5))
        );
        assert_eq!(
            boundaries.bounds(),
            Some(BoundingBox::new(4.0, 51.0, 6.0, 53.0))
        );
    }

    #[test]
    fn feature_serializes_as_geojson() {
        let boundaries = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&boundaries.features[0]).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["properties"]["statnaam"], "Hengelo");

        let again = BoundaryCollection::from_geojson_str(&boundaries.to_geojson_string()).unwrap();
        assert_eq!(again, boundaries);
    }
}
