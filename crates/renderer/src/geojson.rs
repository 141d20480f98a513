//! GeoJSON output for contours.
//!
//! Fills become `Polygon` features, outlines `LineString` features and labels
//! `Point` features carrying their text. Styling travels in the properties so
//! any web map can restyle the layer.

use std::collections::BTreeMap;

use contour_common::{ContourError, ContourResult, GeoPoint};
use serde::{Deserialize, Serialize};

use crate::session::{validate_geometry, ContourRenderer, EntityHandle, HandleAllocator, Primitive};
use crate::style::Color;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// Geometry types emitted for contours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    /// Rings as `[lon, lat]` pairs; only an exterior ring is ever written.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

/// Styling attached to every feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureProperties {
    /// `fill`, `line` or `label`.
    pub kind: String,
    /// `#rrggbb`.
    pub color: String,
    pub opacity: f64,
    /// Metres above the surface.
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl FeatureProperties {
    fn new(kind: &str, color: Color, height: f64) -> Self {
        Self {
            kind: kind.to_string(),
            color: color.to_hex(),
            opacity: color.a as f64 / 255.0,
            height,
            text: None,
        }
    }
}

fn coords(points: &[GeoPoint]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.lon, p.lat]).collect()
}

/// Collects rendered contours as GeoJSON features.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    ids: HandleAllocator,
    features: BTreeMap<EntityHandle, Feature>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Live features in draw order.
    pub fn to_collection(&self) -> FeatureCollection {
        FeatureCollection {
            features: self.features.values().cloned().collect(),
            ..FeatureCollection::new()
        }
    }

    pub fn to_json(&self) -> ContourResult<String> {
        serde_json::to_string_pretty(&self.to_collection())
            .map_err(|e| ContourError::Render(format!("GeoJSON serialization failed: {}", e)))
    }

    fn insert(&mut self, geometry: Geometry, properties: FeatureProperties) -> EntityHandle {
        let handle = self.ids.allocate();
        self.features.insert(
            handle,
            Feature {
                type_: "Feature".to_string(),
                id: handle.to_string(),
                geometry,
                properties,
            },
        );
        handle
    }
}

impl ContourRenderer for GeoJsonRenderer {
    fn render(
        &mut self,
        contour: &[GeoPoint],
        color: Color,
        height: f64,
        primitive: Primitive,
    ) -> ContourResult<EntityHandle> {
        validate_geometry(contour, primitive)?;

        let (geometry, kind) = match primitive {
            Primitive::Fill => {
                let mut ring = coords(contour);
                // GeoJSON rings must repeat their first position.
                if ring.first() != ring.last() {
                    ring.push(ring[0]);
                }
                (Geometry::Polygon { coordinates: vec![ring] }, "fill")
            }
            Primitive::Line => (
                Geometry::LineString {
                    coordinates: coords(contour),
                },
                "line",
            ),
        };

        Ok(self.insert(geometry, FeatureProperties::new(kind, color, height)))
    }

    fn render_label(
        &mut self,
        anchor: GeoPoint,
        text: &str,
        color: Color,
        height: f64,
    ) -> ContourResult<EntityHandle> {
        let properties = FeatureProperties {
            text: Some(text.to_string()),
            ..FeatureProperties::new("label", color, height)
        };
        Ok(self.insert(
            Geometry::Point {
                coordinates: [anchor.lon, anchor.lat],
            },
            properties,
        ))
    }

    fn remove(&mut self, handle: EntityHandle) -> ContourResult<()> {
        self.features
            .remove(&handle)
            .map(|_| ())
            .ok_or(ContourError::EntityNotFound(handle.0))
    }
}
