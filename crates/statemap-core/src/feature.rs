//! Feature extraction: topology objects to geographic polygons.
//!
//! Equivalent of a TopoJSON client's `feature()`: rings referenced as arc
//! index sequences are assembled into closed `geo_types` polygons in
//! lon/lat coordinates.

use crate::topology::{TopoGeometry, Topology, TopologyError};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};

/// A named geographic feature.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

/// Extract every feature of a named topology object.
///
/// Geometry collections are flattened; each polygonal geometry becomes one
/// feature carrying its `name` property.
pub fn features(topology: &Topology, object: &str) -> Result<Vec<Feature>, TopologyError> {
    let geometry = topology.object(object)?;
    let mut out = Vec::new();
    collect(topology, geometry, &mut out)?;
    Ok(out)
}

fn collect(
    topology: &Topology,
    geometry: &TopoGeometry,
    out: &mut Vec<Feature>,
) -> Result<(), TopologyError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect(topology, g, out)?;
            }
        }
        TopoGeometry::Polygon { arcs, properties } => {
            let polygon = assemble_polygon(topology, arcs, properties.name.as_deref())?;
            out.push(Feature {
                name: properties.name.clone(),
                geometry: MultiPolygon(vec![polygon]),
            });
        }
        TopoGeometry::MultiPolygon { arcs, properties } => {
            let polygons = arcs
                .iter()
                .map(|rings| assemble_polygon(topology, rings, properties.name.as_deref()))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Feature {
                name: properties.name.clone(),
                geometry: MultiPolygon(polygons),
            });
        }
    }
    Ok(())
}

fn assemble_polygon(
    topology: &Topology,
    rings: &[Vec<i32>],
    name: Option<&str>,
) -> Result<Polygon<f64>, TopologyError> {
    let label = name.unwrap_or("<unnamed>");
    let mut assembled = rings
        .iter()
        .map(|refs| assemble_ring(topology, refs, label))
        .collect::<Result<Vec<_>, _>>()?;
    if assembled.is_empty() {
        return Err(TopologyError::OpenRing(label.to_string()));
    }
    // First ring is the exterior, the rest are holes.
    let exterior = assembled.remove(0);
    Ok(Polygon::new(exterior, assembled))
}

/// Chain a ring's arcs into one closed coordinate sequence. Consecutive
/// arcs share their join point, which is emitted only once.
fn assemble_ring(
    topology: &Topology,
    refs: &[i32],
    label: &str,
) -> Result<LineString<f64>, TopologyError> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for &reference in refs {
        let arc = topology.decode_arc(reference)?;
        let skip = usize::from(!points.is_empty());
        points.extend(arc.into_iter().skip(skip));
    }
    if points.len() < 4 || points.first() != points.last() {
        return Err(TopologyError::OpenRing(label.to_string()));
    }
    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::tests::TWO_SQUARES;

    fn topo() -> Topology {
        Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap()
    }

    #[test]
    fn test_features_one_per_geometry() {
        let features = features(&topo(), "cells").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name.as_deref(), Some("Left"));
        assert_eq!(features[1].name.as_deref(), Some("Right"));
    }

    #[test]
    fn test_ring_closes_through_shared_arc() {
        let features = features(&topo(), "cells").unwrap();
        let right = features[1].geometry.0[0].exterior();
        // 4 corners plus the repeated closing coordinate
        assert_eq!(right.0.len(), 5);
        assert_eq!(right.0.first(), right.0.last());
        assert!(right.0.contains(&Coord { x: 12.0, y: 21.0 }));
    }

    #[test]
    fn test_multi_polygon_object() {
        let features = features(&topo(), "island").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].geometry.0.len(), 1);
        let ring = features[0].geometry.0[0].exterior();
        assert_eq!(ring.0.len(), 5);
        assert_eq!(ring.0[0], Coord { x: 13.0, y: 20.0 });
    }

    #[test]
    fn test_unknown_object_errors() {
        assert!(features(&topo(), "rivers").is_err());
    }
}
