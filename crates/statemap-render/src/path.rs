//! Path generation: geographic geometry to drawable Bezier paths.
//!
//! A `PathGenerator` composes a projection with a geometry; the output
//! is a pure function of the input feature and the projection settings.

use geo_types::{LineString, MultiLineString, MultiPolygon};
use kurbo::BezPath;
use statemap_core::dataset::MapDataset;
use statemap_core::projection::AlbersUsa;
use statemap_core::widget::Region;

/// Projects geometry into screen-space paths.
#[derive(Debug, Clone, Copy)]
pub struct PathGenerator {
    projection: AlbersUsa,
}

/// The three drawable layers of the map, projected once per
/// (re)initialization and rebuilt wholesale, never patched.
#[derive(Debug, Clone)]
pub struct ProjectedLayers {
    /// One fill shape per state feature, in dataset order.
    pub regions: Vec<Region>,
    /// Merged national outline.
    pub nation_outline: BezPath,
    /// Merged state borders.
    pub state_outline: BezPath,
}

impl PathGenerator {
    pub fn new(projection: AlbersUsa) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &AlbersUsa {
        &self.projection
    }

    /// Project a polygonal feature into one closed subpath per ring.
    /// Vertices outside the projection's zones are skipped.
    pub fn multi_polygon(&self, geometry: &MultiPolygon<f64>) -> BezPath {
        let mut path = BezPath::new();
        for polygon in &geometry.0 {
            self.push_ring(&mut path, polygon.exterior());
            for hole in polygon.interiors() {
                self.push_ring(&mut path, hole);
            }
        }
        path
    }

    /// Project a line mesh into open subpaths.
    pub fn multi_line_string(&self, geometry: &MultiLineString<f64>) -> BezPath {
        let mut path = BezPath::new();
        for line in &geometry.0 {
            let mut points = line
                .0
                .iter()
                .filter_map(|c| self.projection.project(c.x, c.y));
            let Some(first) = points.next() else { continue };
            path.move_to(first);
            for point in points {
                path.line_to(point);
            }
        }
        path
    }

    /// Project a whole dataset into its drawable layers.
    pub fn layers(&self, dataset: &MapDataset) -> ProjectedLayers {
        ProjectedLayers {
            regions: dataset
                .states
                .iter()
                .map(|state| Region {
                    name: state.name.clone(),
                    path: self.multi_polygon(&state.geometry),
                })
                .collect(),
            nation_outline: self.multi_line_string(&dataset.nation_mesh),
            state_outline: self.multi_line_string(&dataset.state_mesh),
        }
    }

    fn push_ring(&self, path: &mut BezPath, ring: &LineString<f64>) {
        // Rings repeat their first coordinate at the end; drop it and let
        // close_path supply the closing segment.
        let coords = ring.0.as_slice();
        let coords = if coords.len() > 1 && coords.first() == coords.last() {
            &coords[..coords.len() - 1]
        } else {
            coords
        };
        let mut points = coords
            .iter()
            .filter_map(|c| self.projection.project(c.x, c.y));
        let Some(first) = points.next() else { return };
        path.move_to(first);
        for point in points {
            path.line_to(point);
        }
        path.close_path();
    }
}
