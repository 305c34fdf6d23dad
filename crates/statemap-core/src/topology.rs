//! TopoJSON topology document and arc decoding.
//!
//! A topology stores every border arc once; geometries reference arcs by
//! index, with a bitwise-complement index (`~i`) meaning "arc `i`,
//! traversed backwards". Quantized topologies additionally delta-encode
//! arc positions against a linear transform.

use geo_types::Coord;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while decoding a topology document.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid topology JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("topology has no object named `{0}`")]
    UnknownObject(String),
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange { index: usize, count: usize },
    #[error("ring does not close in `{0}`")]
    OpenRing(String),
}

/// Quantization transform: position = scale * quantized + translate.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// Per-geometry attributes. The bundled dataset only carries a name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub name: Option<String>,
}

/// A geometry object inside a topology, with rings given as arc indices.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Polygon {
        arcs: Vec<Vec<i32>>,
        #[serde(default)]
        properties: Properties,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i32>>>,
        #[serde(default)]
        properties: Properties,
    },
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
}

/// A decoded TopoJSON document. Immutable once parsed; arcs are expanded
/// to geographic coordinates on demand.
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub objects: BTreeMap<String, TopoGeometry>,
    arcs: Vec<Vec<[f64; 2]>>,
}

impl Topology {
    /// Parse a topology from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Look up a named object.
    pub fn object(&self, name: &str) -> Result<&TopoGeometry, TopologyError> {
        self.objects
            .get(name)
            .ok_or_else(|| TopologyError::UnknownObject(name.to_string()))
    }

    /// Number of arcs in the document.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Decode one arc to absolute lon/lat coordinates.
    ///
    /// A negative reference (`~i`) yields arc `i` with its points reversed,
    /// so that consecutive ring arcs always join end-to-start.
    pub fn decode_arc(&self, reference: i32) -> Result<Vec<Coord<f64>>, TopologyError> {
        let reverse = reference < 0;
        let index = (if reverse { !reference } else { reference }) as usize;
        let raw = self.arcs.get(index).ok_or(TopologyError::ArcOutOfRange {
            index,
            count: self.arcs.len(),
        })?;

        let mut points = Vec::with_capacity(raw.len());
        match &self.transform {
            Some(t) => {
                // Quantized arcs are delta-encoded: accumulate, then scale.
                let (mut x, mut y) = (0.0, 0.0);
                for p in raw {
                    x += p[0];
                    y += p[1];
                    points.push(Coord {
                        x: t.scale[0] * x + t.translate[0],
                        y: t.scale[1] * y + t.translate[1],
                    });
                }
            }
            None => {
                for p in raw {
                    points.push(Coord { x: p[0], y: p[1] });
                }
            }
        }

        if reverse {
            points.reverse();
        }
        Ok(points)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two unit squares sharing their vertical middle edge, plus a
    /// detached closed ring; quantized with a 0.5 scale.
    pub(crate) const TWO_SQUARES: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.5, 0.5], "translate": [10.0, 20.0]},
        "objects": {
            "cells": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "arcs": [[0, 1]], "properties": {"name": "Left"}},
                {"type": "Polygon", "arcs": [[2, -1]], "properties": {"name": "Right"}}
            ]},
            "island": {"type": "GeometryCollection", "geometries": [
                {"type": "MultiPolygon", "arcs": [[[3]]], "properties": {"name": "Island"}}
            ]}
        },
        "arcs": [
            [[2, 0], [0, 2]],
            [[2, 2], [-2, 0], [0, -2], [2, 0]],
            [[2, 0], [2, 0], [0, 2], [-2, 0]],
            [[6, 0], [2, 0], [0, 2], [-2, 0], [0, -2]]
        ]
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let topo = Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap();
        assert_eq!(topo.arc_count(), 4);
        assert!(topo.object("cells").is_ok());
        assert!(matches!(
            topo.object("counties"),
            Err(TopologyError::UnknownObject(_))
        ));
    }

    #[test]
    fn test_decode_arc_applies_transform() {
        let topo = Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap();
        let arc = topo.decode_arc(0).unwrap();
        // deltas [2,0],[0,2] accumulate to (2,0),(2,2), then scale/translate
        assert_eq!(arc, vec![Coord { x: 11.0, y: 20.0 }, Coord { x: 11.0, y: 21.0 }]);
    }

    #[test]
    fn test_decode_arc_reversed() {
        let topo = Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap();
        let forward = topo.decode_arc(1).unwrap();
        let mut backward = topo.decode_arc(!1).unwrap();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_decode_arc_out_of_range() {
        let topo = Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap();
        assert!(matches!(
            topo.decode_arc(17),
            Err(TopologyError::ArcOutOfRange { index: 17, count: 4 })
        ));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(
            Topology::from_slice(b"{\"type\": \"Topology\""),
            Err(TopologyError::Parse(_))
        ));
    }
}
