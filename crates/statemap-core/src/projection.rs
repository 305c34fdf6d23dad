//! Map projections.
//!
//! `ConicEqualArea` is the Albers conic equal-area projection with the
//! usual rotate / center / scale / translate pipeline. `AlbersUsa` is the
//! composite U.S. projection: the lower 48 on Albers standard parallels,
//! with Alaska and Hawaii re-projected into insets below the south-west
//! corner, selected by projected-space clip extents.

use kurbo::Point;

/// Default composite scale, matching the reference projection.
pub const DEFAULT_SCALE: f64 = 1070.0;

/// Surface height the default scale is calibrated for. A surface of
/// height `h` uses scale `DEFAULT_SCALE * h / REFERENCE_HEIGHT`.
pub const REFERENCE_HEIGHT: f64 = 600.0;

const EPSILON: f64 = 1e-6;

/// Albers conic equal-area projection.
///
/// Stateless after construction: `project` is a pure function of its
/// input coordinate.
#[derive(Debug, Clone, Copy)]
pub struct ConicEqualArea {
    // conic constants derived from the standard parallels
    n: f64,
    c: f64,
    r0: f64,
    /// Longitude rotation in degrees (applied before projecting).
    rotate: f64,
    /// Projection center in rotated coordinates, degrees.
    center: (f64, f64),
    scale: f64,
    translate: (f64, f64),
    // cached screen offset so the center lands on the translate point
    dx: f64,
    dy: f64,
}

impl ConicEqualArea {
    /// Build a projection from standard parallels, a longitude rotation
    /// and a center (in rotated coordinates), all in degrees.
    pub fn new(parallels: (f64, f64), rotate: f64, center: (f64, f64)) -> Self {
        let sy0 = parallels.0.to_radians().sin();
        let n = (sy0 + parallels.1.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        let mut projection = Self {
            n,
            c,
            r0,
            rotate,
            center,
            scale: 1.0,
            translate: (0.0, 0.0),
            dx: 0.0,
            dy: 0.0,
        };
        projection.recenter();
        projection
    }

    /// Set the scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self.recenter();
        self
    }

    /// Set the translate point (where the center projects to).
    pub fn with_translate(mut self, translate: (f64, f64)) -> Self {
        self.translate = translate;
        self.recenter();
        self
    }

    /// Project a lon/lat coordinate (degrees) to screen space.
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let lambda = normalize_degrees(lon + self.rotate).to_radians();
        let (x, y) = self.raw(lambda, lat.to_radians());
        Point::new(self.dx + self.scale * x, self.dy - self.scale * y)
    }

    /// The spherical projection itself, rotation and screen transform
    /// excluded. Inputs in radians.
    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let angle = lambda * self.n;
        (r * angle.sin(), self.r0 - r * angle.cos())
    }

    fn recenter(&mut self) {
        let (cx, cy) = self.raw(self.center.0.to_radians(), self.center.1.to_radians());
        self.dx = self.translate.0 - self.scale * cx;
        self.dy = self.translate.1 + self.scale * cy;
    }
}

/// Normalize a longitude in degrees to [-180, 180).
fn normalize_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Composite projection for the United States: lower 48, Alaska (at 0.35
/// scale) and Hawaii, each clipped to its own screen-space extent.
#[derive(Debug, Clone, Copy)]
pub struct AlbersUsa {
    scale: f64,
    translate: (f64, f64),
    lower48: ConicEqualArea,
    alaska: ConicEqualArea,
    hawaii: ConicEqualArea,
}

impl AlbersUsa {
    /// The composite projection at its default scale and translate.
    pub fn new() -> Self {
        Self::build(DEFAULT_SCALE, (480.0, 250.0))
    }

    /// A projection fitted to a surface: scale proportional to the
    /// surface height, map centered in the surface.
    pub fn fitted(width: f64, height: f64) -> Self {
        Self::build(
            DEFAULT_SCALE * height / REFERENCE_HEIGHT,
            (width / 2.0, height / 2.0),
        )
    }

    /// Set the composite scale factor.
    pub fn scale(self, scale: f64) -> Self {
        Self::build(scale, self.translate)
    }

    /// Set the translate point.
    pub fn translate(self, translate: (f64, f64)) -> Self {
        Self::build(self.scale, translate)
    }

    /// The current composite scale.
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    /// The current translate point.
    pub fn translate_point(&self) -> (f64, f64) {
        self.translate
    }

    fn build(k: f64, translate: (f64, f64)) -> Self {
        let (tx, ty) = translate;
        Self {
            scale: k,
            translate,
            lower48: ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7))
                .with_scale(k)
                .with_translate((tx, ty)),
            alaska: ConicEqualArea::new((55.0, 65.0), 154.0, (-2.0, 58.5))
                .with_scale(0.35 * k)
                .with_translate((tx - 0.307 * k, ty + 0.201 * k)),
            hawaii: ConicEqualArea::new((8.0, 18.0), 157.0, (-3.0, 19.9))
                .with_scale(k)
                .with_translate((tx - 0.205 * k, ty + 0.212 * k)),
        }
    }

    /// Project a lon/lat coordinate (degrees) to screen space.
    ///
    /// Tries the lower 48 first, then the Alaska and Hawaii insets;
    /// coordinates outside all three extents yield `None`.
    pub fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        let k = self.scale;
        let (tx, ty) = self.translate;

        let p = self.lower48.project(lon, lat);
        if in_extent(p, tx - 0.455 * k, ty - 0.238 * k, tx + 0.455 * k, ty + 0.238 * k) {
            return Some(p);
        }
        let p = self.alaska.project(lon, lat);
        if in_extent(
            p,
            tx - 0.425 * k + EPSILON,
            ty + 0.120 * k + EPSILON,
            tx - 0.214 * k - EPSILON,
            ty + 0.234 * k - EPSILON,
        ) {
            return Some(p);
        }
        let p = self.hawaii.project(lon, lat);
        if in_extent(
            p,
            tx - 0.214 * k + EPSILON,
            ty + 0.166 * k + EPSILON,
            tx - 0.115 * k - EPSILON,
            ty + 0.234 * k - EPSILON,
        ) {
            return Some(p);
        }
        None
    }
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new()
    }
}

fn in_extent(p: Point, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
    p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
}
