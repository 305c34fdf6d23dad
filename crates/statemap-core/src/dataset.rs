//! The bundled map dataset.
//!
//! One topology file is compiled into the binary and decoded once at
//! widget construction; everything downstream treats the result as
//! immutable. The loader accepts any topology with the same
//! `nation`/`states` schema, so a full-resolution atlas file can replace
//! the bundled one without code changes.

use crate::feature::features;
use crate::mesh::mesh;
use crate::topology::{Topology, TopologyError};
use geo_types::{MultiLineString, MultiPolygon};

/// Coarse quantized topology of the United States: 50 states plus the
/// District of Columbia, with borders shared between adjacent states and
/// a merged national outline (mainland, Alaska, Hawaii).
static US_STATES_TOPO: &[u8] = include_bytes!("../assets/us-states.topo.json");

/// One fillable state feature.
#[derive(Debug, Clone)]
pub struct StateFeature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// The decoded, immutable geometry the widget renders.
#[derive(Debug, Clone)]
pub struct MapDataset {
    /// One feature per state, in document order.
    pub states: Vec<StateFeature>,
    /// Merged national outline.
    pub nation_mesh: MultiLineString<f64>,
    /// Merged state borders (internal and external, each edge once).
    pub state_mesh: MultiLineString<f64>,
}

impl MapDataset {
    /// Decode the bundled topology.
    pub fn bundled() -> Result<Self, TopologyError> {
        Self::from_slice(US_STATES_TOPO)
    }

    /// Decode a topology with `nation` and `states` objects.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let topology = Topology::from_slice(bytes)?;
        let states = features(&topology, "states")?
            .into_iter()
            .map(|feature| StateFeature {
                name: feature.name.unwrap_or_default(),
                geometry: feature.geometry,
            })
            .collect::<Vec<_>>();
        let nation_mesh = mesh(&topology, "nation")?;
        let state_mesh = mesh(&topology, "states")?;
        log::debug!(
            "dataset decoded: {} states, {} arcs",
            states.len(),
            topology.arc_count()
        );
        Ok(Self {
            states,
            nation_mesh,
            state_mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::AlbersUsa;

    #[test]
    fn test_bundled_dataset_decodes() {
        let dataset = MapDataset::bundled().unwrap();
        assert_eq!(dataset.states.len(), 51);
        assert!(!dataset.nation_mesh.0.is_empty());
        assert!(!dataset.state_mesh.0.is_empty());
    }

    #[test]
    fn test_state_names_are_unique_and_present() {
        let dataset = MapDataset::bundled().unwrap();
        let mut names: Vec<&str> = dataset.states.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"California"));
        assert!(names.contains(&"Hawaii"));
        assert!(names.contains(&"District of Columbia"));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 51);
    }

    #[test]
    fn test_rings_are_closed() {
        let dataset = MapDataset::bundled().unwrap();
        for state in &dataset.states {
            for polygon in &state.geometry.0 {
                let ring = polygon.exterior();
                assert!(ring.0.len() >= 4, "degenerate ring in {}", state.name);
                assert_eq!(ring.0.first(), ring.0.last(), "open ring in {}", state.name);
            }
        }
    }

    #[test]
    fn test_every_vertex_projects() {
        // The bundled geometry must be fully visible at the widget's
        // fixed surface size.
        let dataset = MapDataset::bundled().unwrap();
        let projection = AlbersUsa::fitted(1000.0, 600.0);
        for state in &dataset.states {
            for polygon in &state.geometry.0 {
                for coord in &polygon.exterior().0 {
                    assert!(
                        projection.project(coord.x, coord.y).is_some(),
                        "unprojectable vertex in {}",
                        state.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_meshes_conserve_segments() {
        let dataset = MapDataset::bundled().unwrap();
        let segments = |m: &MultiLineString<f64>| -> usize {
            m.0.iter().map(|l| l.0.len() - 1).sum()
        };
        // 119 shared lattice edges plus two 4-segment island rings.
        assert_eq!(segments(&dataset.state_mesh), 127);
        // 42 mainland boundary edges plus the two island rings.
        assert_eq!(segments(&dataset.nation_mesh), 50);
    }
}
