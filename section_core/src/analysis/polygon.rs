//! Exact section properties of polygonal regions by boundary integration.
//!
//! For each ring edge `(x0, y0) -> (x1, y1)` with `c = x0·y1 - x1·y0`:
//!
//! ```text
//!   A   = Σ c / 2
//!   Qx  = Σ (y0 + y1) c / 6                      (∫ y dA)
//!   Qy  = Σ (x0 + x1) c / 6                      (∫ x dA)
//!   Ixx = Σ (y0² + y0·y1 + y1²) c / 12           (∫ y² dA)
//!   Iyy = Σ (x0² + x0·x1 + x1²) c / 12           (∫ x² dA)
//!   Ixy = Σ (x0·y1 + 2x0·y0 + 2x1·y1 + x1·y0) c / 24
//! ```
//!
//! All integrals are about the global origin. Centroidal values follow from
//! the parallel axis theorem.

use std::ops::{Add, AddAssign, Sub};

use tracing::debug;

use super::{SectionAnalyzer, SectionProperties};
use crate::errors::{SectionError, SectionResult};
use crate::geometry::polygon::edges;
use crate::geometry::{CompoundGeometry, Point2D, Polygon};
use crate::materials::Material;

/// Area integrals of a region about the global origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionIntegrals {
    pub area: f64,
    pub qx: f64,
    pub qy: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub ixy: f64,
}

impl SectionIntegrals {
    /// Signed integrals of one ring; negative area for clockwise rings.
    pub fn of_ring(ring: &[Point2D]) -> Self {
        let mut s = SectionIntegrals::default();
        for (a, b) in edges(ring) {
            let c = a.x * b.y - b.x * a.y;
            s.area += c;
            s.qx += (a.y + b.y) * c;
            s.qy += (a.x + b.x) * c;
            s.ixx += (a.y * a.y + a.y * b.y + b.y * b.y) * c;
            s.iyy += (a.x * a.x + a.x * b.x + b.x * b.x) * c;
            s.ixy += (a.x * b.y + 2.0 * a.x * a.y + 2.0 * b.x * b.y + b.x * a.y) * c;
        }
        SectionIntegrals {
            area: s.area / 2.0,
            qx: s.qx / 6.0,
            qy: s.qy / 6.0,
            ixx: s.ixx / 12.0,
            iyy: s.iyy / 12.0,
            ixy: s.ixy / 24.0,
        }
    }

    /// Integrals of the ring taken with positive area, whatever its winding
    fn of_ring_unsigned(ring: &[Point2D]) -> Self {
        let s = Self::of_ring(ring);
        if s.area < 0.0 {
            s.scaled(-1.0)
        } else {
            s
        }
    }

    /// Exterior minus holes.
    pub fn of_polygon(polygon: &Polygon) -> Self {
        polygon
            .holes
            .iter()
            .fold(Self::of_ring_unsigned(&polygon.exterior), |acc, hole| {
                acc - Self::of_ring_unsigned(hole)
            })
    }

    pub fn scaled(self, k: f64) -> Self {
        SectionIntegrals {
            area: self.area * k,
            qx: self.qx * k,
            qy: self.qy * k,
            ixx: self.ixx * k,
            iyy: self.iyy * k,
            ixy: self.ixy * k,
        }
    }
}

impl Add for SectionIntegrals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        SectionIntegrals {
            area: self.area + rhs.area,
            qx: self.qx + rhs.qx,
            qy: self.qy + rhs.qy,
            ixx: self.ixx + rhs.ixx,
            iyy: self.iyy + rhs.iyy,
            ixy: self.ixy + rhs.ixy,
        }
    }
}

impl Sub for SectionIntegrals {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs.scaled(-1.0)
    }
}

impl AddAssign for SectionIntegrals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Elastic section analysis of polygon outlines, weighted by elastic modulus.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonAnalyzer;

impl PolygonAnalyzer {
    pub fn new() -> Self {
        PolygonAnalyzer
    }
}

impl SectionAnalyzer for PolygonAnalyzer {
    fn analyze(&self, section: &CompoundGeometry, reference: &Material) -> SectionResult<SectionProperties> {
        let mut area = 0.0;
        let mut perimeter = 0.0;
        // Every integral multiplied by the component's elastic modulus
        let mut weighted = SectionIntegrals::default();

        for geometry in section.geometries() {
            let e = geometry.material.elastic_modulus_mpa;
            for polygon in &geometry.polygons {
                let integrals = SectionIntegrals::of_polygon(polygon);
                area += integrals.area;
                perimeter += polygon.perimeter();
                weighted += integrals.scaled(e);
            }
        }

        if !(area > 0.0) || !(weighted.area > 0.0) {
            return Err(SectionError::analysis_failed(format!(
                "section has no net area ({} mm²)",
                area
            )));
        }

        let ea = weighted.area;
        let cx = weighted.qy / ea;
        let cy = weighted.qx / ea;

        let e_ixx = weighted.ixx - ea * cy * cy;
        let e_iyy = weighted.iyy - ea * cx * cx;
        let e_ixy = weighted.ixy - ea * cx * cy;

        let e_ref = reference.elastic_modulus_mpa;
        let ixx = e_ixx / e_ref;
        let iyy = e_iyy / e_ref;
        let ixy = e_ixy / e_ref;

        let bounds = section
            .bounds()
            .ok_or_else(|| SectionError::analysis_failed("section has no vertices"))?;

        let avg = (ixx + iyy) / 2.0;
        let diff = ((ixx - iyy) / 2.0).hypot(ixy);
        let phi = (-2.0 * ixy).atan2(ixx - iyy).to_degrees() / 2.0;

        debug!(area, cx, cy, e_ixx, e_iyy, reference = %reference.name, "section analyzed");

        Ok(SectionProperties {
            area,
            perimeter,
            centroid: Point2D::new(cx, cy),
            e_ixx,
            e_iyy,
            e_ixy,
            ixx,
            iyy,
            ixy,
            zxx_plus: elastic_modulus(ixx, bounds.max_y - cy),
            zxx_minus: elastic_modulus(ixx, cy - bounds.min_y),
            zyy_plus: elastic_modulus(iyy, bounds.max_x - cx),
            zyy_minus: elastic_modulus(iyy, cx - bounds.min_x),
            i1: avg + diff,
            i2: avg - diff,
            phi,
        })
    }
}

/// `I / c`, or zero when the extreme fibre lies on the axis
fn elastic_modulus(second_moment: f64, fibre_distance: f64) -> f64 {
    if fibre_distance > 0.0 {
        second_moment / fibre_distance
    } else {
        0.0
    }
}
