//! Merged border meshes.
//!
//! A mesh draws every border arc of an object exactly once, so edges
//! shared between adjacent regions are stroked a single time instead of
//! twice. This is what keeps the state-outline layer crisp at half-pixel
//! stroke widths.

use crate::topology::{TopoGeometry, Topology, TopologyError};
use geo_types::{Coord, LineString, MultiLineString};
use std::collections::BTreeSet;

/// Build the merged line mesh of a named topology object.
///
/// Every arc referenced by the object contributes once, in forward
/// orientation; contiguous arcs are stitched end-to-start into longer
/// lines. Stitching is greedy and does not reorient arcs, so the result
/// may contain more lines than the theoretical minimum; segment content
/// is identical either way.
pub fn mesh(topology: &Topology, object: &str) -> Result<MultiLineString<f64>, TopologyError> {
    let geometry = topology.object(object)?;
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    collect_arcs(geometry, &mut seen, &mut order);

    let segments = order
        .into_iter()
        .map(|index| topology.decode_arc(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiLineString(stitch(segments)))
}

fn collect_arcs(geometry: &TopoGeometry, seen: &mut BTreeSet<i32>, order: &mut Vec<i32>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_arcs(g, seen, order);
            }
        }
        TopoGeometry::Polygon { arcs, .. } => {
            for ring in arcs {
                visit_ring(ring, seen, order);
            }
        }
        TopoGeometry::MultiPolygon { arcs, .. } => {
            for polygon in arcs {
                for ring in polygon {
                    visit_ring(ring, seen, order);
                }
            }
        }
    }
}

fn visit_ring(refs: &[i32], seen: &mut BTreeSet<i32>, order: &mut Vec<i32>) {
    for &reference in refs {
        let index = if reference < 0 { !reference } else { reference };
        if seen.insert(index) {
            order.push(index);
        }
    }
}

fn stitch(segments: Vec<Vec<Coord<f64>>>) -> Vec<LineString<f64>> {
    let mut lines: Vec<Vec<Coord<f64>>> = Vec::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        if let Some(i) = lines.iter().position(|l| l.last() == segment.first()) {
            lines[i].extend(segment.into_iter().skip(1));
        } else if let Some(i) = lines.iter().position(|l| l.first() == segment.last()) {
            let mut joined = segment;
            joined.extend(lines[i].iter().skip(1).copied());
            lines[i] = joined;
        } else {
            lines.push(segment);
        }
    }
    lines.into_iter().map(LineString).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::tests::TWO_SQUARES;

    fn topo() -> Topology {
        Topology::from_slice(TWO_SQUARES.as_bytes()).unwrap()
    }

    fn segment_count(mesh: &MultiLineString<f64>) -> usize {
        mesh.0.iter().map(|l| l.0.len() - 1).sum()
    }

    #[test]
    fn test_shared_arc_appears_once() {
        let mesh = mesh(&topo(), "cells").unwrap();
        // Arcs 0 (1 segment), 1 and 2 (3 segments each); the shared middle
        // edge is not duplicated even though both squares reference it.
        assert_eq!(segment_count(&mesh), 7);
    }

    #[test]
    fn test_closed_single_arc_ring() {
        let mesh = mesh(&topo(), "island").unwrap();
        assert_eq!(mesh.0.len(), 1);
        assert_eq!(segment_count(&mesh), 4);
        let line = &mesh.0[0];
        assert_eq!(line.0.first(), line.0.last());
    }

    #[test]
    fn test_unknown_object_errors() {
        assert!(mesh(&topo(), "roads").is_err());
    }
}
