//! # Section Geometry
//!
//! Plane geometry for cross-section outlines. Coordinates are in the units of
//! the source drawing, assumed millimetres.
//!
//! ## Structure
//!
//! ```text
//! CompoundGeometry
//! └── geometries: Vec<Geometry>       one per component, each with a material
//!     └── polygons: Vec<Polygon>      exterior ring + holes
//!         └── rings of Point2D        implicitly closed, no repeated end point
//! ```
//!
//! ## Modules
//!
//! - [`arc`] - Bulge arc discretization (DXF polyline arcs to points)
//! - [`polyline`] - Expanding bulge-tagged vertex lists into rings
//! - [`polygon`] - Rings, polygons with holes, containment and nesting

pub mod arc;
pub mod polygon;
pub mod polyline;

pub use arc::{arc_points, arc_points_from_bulge, distance, ArcSpec, BulgeSegment, SweepDirection};
pub use polygon::{assemble_polygons, Bounds, Polygon};
pub use polyline::{expand_bulge_ring, BulgeVertex, ExpandedRing};

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};
use crate::materials::Material;

/// A point in the section plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    /// Point at `angle` (radians) on the circle of `radius` about `center`
    pub fn on_circle(center: Point2D, radius: f64, angle: f64) -> Self {
        Point2D::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    pub fn midpoint(self, other: Point2D) -> Self {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance_to(self, other: Point2D) -> f64 {
        distance(self, other)
    }

    /// True when both coordinates differ by at most `tolerance`
    pub fn approx_eq(self, other: Point2D, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// One component of a section: polygons sharing a single material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Display name (usually the source file name)
    pub name: String,
    pub material: Material,
    pub polygons: Vec<Polygon>,
}

impl Geometry {
    pub fn new(name: impl Into<String>, material: Material, polygons: Vec<Polygon>) -> Self {
        Geometry {
            name: name.into(),
            material,
            polygons,
        }
    }

    /// Net area (exteriors minus holes)
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Combined bounds of all polygons, `None` when there are no polygons
    pub fn bounds(&self) -> Option<Bounds> {
        self.polygons
            .iter()
            .map(Polygon::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

/// Multi-material section assembled from several components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundGeometry {
    geometries: Vec<Geometry>,
}

impl CompoundGeometry {
    /// Assemble a compound section. At least one component is required.
    pub fn new(geometries: Vec<Geometry>) -> SectionResult<Self> {
        if geometries.is_empty() {
            return Err(SectionError::invalid_input(
                "components",
                "[]",
                "No components provided for compound geometry",
            ));
        }
        Ok(CompoundGeometry { geometries })
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.geometries
            .iter()
            .filter_map(Geometry::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

impl From<Geometry> for CompoundGeometry {
    fn from(geometry: Geometry) -> Self {
        CompoundGeometry {
            geometries: vec![geometry],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::default_materials;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(size, 0.0),
            Point2D::new(size, size),
            Point2D::new(0.0, size),
        ])
    }

    #[test]
    fn test_point_helpers() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.midpoint(b), Point2D::new(1.5, 2.0));
        assert!(b.approx_eq(Point2D::new(3.0 + 1e-12, 4.0), 1e-9));

        let p = Point2D::on_circle(Point2D::new(1.0, 1.0), 2.0, std::f64::consts::FRAC_PI_2);
        assert!(p.approx_eq(Point2D::new(1.0, 3.0), 1e-12));
    }

    #[test]
    fn test_compound_requires_components() {
        let err = CompoundGeometry::new(vec![]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_compound_bounds() {
        let steel = default_materials()[1].clone();
        let a = Geometry::new("a", steel.clone(), vec![square(10.0)]);
        let b = Geometry::new("b", steel, vec![square(30.0)]);
        let compound = CompoundGeometry::new(vec![a, b]).unwrap();
        let bounds = compound.bounds().unwrap();
        assert_eq!(bounds.max_x, 30.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(compound.len(), 2);
    }
}
