#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Massachusetts school district polygons.
//!
//! Parses the district `GeoJSON` `FeatureCollection` into
//! [`DistrictShape`]s, fits a Mercator projection to the collection,
//! produces SVG path data, and resolves map clicks back to districts with an
//! R-tree point-in-polygon index.

pub mod locator;
pub mod path;
pub mod projection;

use std::collections::BTreeSet;

use geo::{BoundingRect, MultiPolygon, Rect};
use geojson::{Feature, GeoJson};
use ma_equity_district_models::DistrictFeature;
use thiserror::Error;

pub use locator::DistrictLocator;
pub use path::path_data;
pub use projection::MercatorProjection;

/// Feature property holding the district code.
pub const CODE_PROPERTY: &str = "ORG8CODE";

/// Feature property holding the district display name.
pub const NAME_PROPERTY: &str = "DISTRICT_N";

/// Errors that can occur while reading district polygons.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// The text is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// Kind of `GeoJSON` object that was found instead.
        found: &'static str,
    },
}

/// A district and its boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictShape {
    /// Code and display name.
    pub feature: DistrictFeature,
    /// Boundary in longitude/latitude degrees.
    pub polygon: MultiPolygon<f64>,
}

/// All district shapes in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictCollection {
    shapes: Vec<DistrictShape>,
}

impl DistrictCollection {
    /// Wraps already-parsed shapes.
    #[must_use]
    pub const fn new(shapes: Vec<DistrictShape>) -> Self {
        Self { shapes }
    }

    /// Parses a `GeoJSON` `FeatureCollection`.
    ///
    /// Features without a code, a name, or a polygonal geometry are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the text is not `GeoJSON` or not a
    /// `FeatureCollection`.
    pub fn parse(text: &str) -> Result<Self, GeographyError> {
        let collection = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Feature(_) => {
                return Err(GeographyError::NotFeatureCollection { found: "Feature" });
            }
            GeoJson::Geometry(_) => {
                return Err(GeographyError::NotFeatureCollection { found: "Geometry" });
            }
        };

        let total = collection.features.len();
        let shapes: Vec<DistrictShape> = collection
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(i, feature)| parse_feature(i, feature))
            .collect();

        log::info!("Loaded {} of {total} district features", shapes.len());

        Ok(Self::new(shapes))
    }

    /// Shapes in collection order.
    #[must_use]
    pub fn shapes(&self) -> &[DistrictShape] {
        &self.shapes
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the collection holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// First shape with the given district code.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&DistrictShape> {
        self.shapes.iter().find(|s| s.feature.code == code)
    }

    /// First shape with the given display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&DistrictShape> {
        self.shapes.iter().find(|s| s.feature.name == name)
    }

    /// Distinct display names, sorted, as offered by the district selector.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .map(|s| s.feature.name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bounding box of every shape, in degrees.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes
            .iter()
            .filter_map(|s| s.polygon.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }
}

fn parse_feature(position: usize, feature: Feature) -> Option<DistrictShape> {
    let Some(code) = property_text(&feature, CODE_PROPERTY) else {
        log::warn!("Skipping feature {position}: missing {CODE_PROPERTY}");
        return None;
    };
    let Some(name) = property_text(&feature, NAME_PROPERTY) else {
        log::warn!("Skipping feature {position} ({code}): missing {NAME_PROPERTY}");
        return None;
    };
    let Some(geometry) = feature.geometry else {
        log::warn!("Skipping district {name} ({code}): no geometry");
        return None;
    };

    let polygon = match geo::Geometry::<f64>::try_from(geometry) {
        Ok(geo::Geometry::MultiPolygon(mp)) => mp,
        Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
        Ok(other) => {
            log::warn!(
                "Skipping district {name} ({code}): unsupported geometry {}",
                geometry_kind(&other)
            );
            return None;
        }
        Err(e) => {
            log::warn!("Skipping district {name} ({code}): {e}");
            return None;
        }
    };

    Some(DistrictShape {
        feature: DistrictFeature { code, name },
        polygon,
    })
}

/// Reads a string-or-number property as trimmed text.
fn property_text(feature: &Feature, key: &str) -> Option<String> {
    let text = match feature.property(key)? {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

const fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two unit-ish squares side by side plus a feature without geometry.
    pub const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "00010000", "DISTRICT_N": "Abington" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.0, 42.0], [-70.0, 42.0], [-70.0, 43.0], [-71.0, 43.0], [-71.0, 42.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ORG8CODE": 350000, "DISTRICT_N": "Boston" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-72.0, 42.0], [-71.0, 42.0], [-71.0, 43.0], [-72.0, 43.0], [-72.0, 42.0]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ORG8CODE": "00020000", "DISTRICT_N": "Acton" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "DISTRICT_N": "Nowhere" },
                "geometry": {
                    "type": "Point",
                    "coordinates": [-71.5, 42.5]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_districts_and_skips_unusable_features() {
        let collection = DistrictCollection::parse(SAMPLE).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.shapes()[0].feature.code, "00010000");
        assert_eq!(collection.shapes()[1].feature.code, "350000");
        assert_eq!(collection.shapes()[1].feature.name, "Boston");
    }

    #[test]
    fn finds_by_code_and_name() {
        let collection = DistrictCollection::parse(SAMPLE).unwrap();
        assert_eq!(
            collection.find_by_name("Boston").unwrap().feature.code,
            "350000"
        );
        assert_eq!(
            collection.find_by_code("00010000").unwrap().feature.name,
            "Abington"
        );
        assert!(collection.find_by_name("Acton").is_none());
    }

    #[test]
    fn names_are_sorted_and_distinct() {
        let mut collection = DistrictCollection::parse(SAMPLE).unwrap();
        collection.shapes.push(collection.shapes[0].clone());
        assert_eq!(collection.sorted_names(), vec!["Abington", "Boston"]);
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let collection = DistrictCollection::parse(SAMPLE).unwrap();
        let bounds = collection.bounds().unwrap();
        assert!((bounds.min().x - -72.0).abs() < f64::EPSILON);
        assert!((bounds.max().x - -70.0).abs() < f64::EPSILON);
        assert!((bounds.min().y - 42.0).abs() < f64::EPSILON);
        assert!((bounds.max().y - 43.0).abs() < f64::EPSILON);
        assert!(DistrictCollection::default().bounds().is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let err = DistrictCollection::parse(r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            GeographyError::NotFeatureCollection { found: "Geometry" }
        ));
        assert!(matches!(
            DistrictCollection::parse("not json"),
            Err(GeographyError::GeoJson(_))
        ));
    }
}
