//! # Bulge Arc Discretization
//!
//! DXF `LWPOLYLINE`/`POLYLINE` entities encode a circular arc between two
//! consecutive vertices with a single scalar, the *bulge*:
//!
//! ```text
//!   bulge = tan(θ / 4)        θ = included angle of the arc
//!
//!   bulge > 0   counter-clockwise from p1 to p2
//!   bulge < 0   clockwise from p1 to p2
//!   bulge = 0   straight edge (no arc)
//!   |bulge| = 1 semicircle
//! ```
//!
//! This module resolves a bulge segment into its circle (center, radius,
//! angles) and samples it into points so the importer can splice the arc into
//! a polygon boundary in place of the single bulge-tagged edge.
//!
//! ## Example
//!
//! ```rust
//! use section_core::geometry::{arc_points_from_bulge, Point2D};
//!
//! // Semicircle over a 10 mm chord, sampled every 90 degrees
//! let points = arc_points_from_bulge(
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(10.0, 0.0),
//!     1.0,
//!     90.0,
//! ).unwrap();
//!
//! assert_eq!(points.len(), 3);
//! assert!(points[1].approx_eq(Point2D::new(5.0, -5.0), 1e-9));
//! ```

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Point2D;
use crate::errors::{SectionError, SectionResult};

/// Default arc fidelity used by the importer
pub const DEFAULT_DEGREES_PER_SEGMENT: f64 = 10.0;

/// Euclidean distance between two points.
#[inline]
pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Sample a circular arc from `start_angle` to `end_angle` (radians).
///
/// The arc is always walked in the increasing-angle (counter-clockwise)
/// sense: when `end_angle < start_angle` a full turn is added to
/// `end_angle`. The number of chords is
/// `max(1, round(degrees(sweep) / degrees_per_segment))`, and
/// `num_segments + 1` points are returned, first at `start_angle` and last at
/// `end_angle`.
///
/// `degrees_per_segment` must be positive. A zero sweep yields two identical
/// points; a zero radius yields a cluster at `center`.
///
/// # Example
/// ```rust
/// use section_core::geometry::{arc_points, Point2D};
///
/// let quarter = arc_points(0.0, std::f64::consts::FRAC_PI_2, 1.0, Point2D::default(), 10.0);
/// assert_eq!(quarter.len(), 10);
/// ```
pub fn arc_points(
    start_angle: f64,
    end_angle: f64,
    radius: f64,
    center: Point2D,
    degrees_per_segment: f64,
) -> Vec<Point2D> {
    debug_assert!(degrees_per_segment > 0.0, "degrees_per_segment must be positive");

    let end_angle = if end_angle < start_angle {
        end_angle + TAU
    } else {
        end_angle
    };
    let sweep = end_angle - start_angle;
    let num_segments = ((sweep.abs().to_degrees() / degrees_per_segment).round() as usize).max(1);

    (0..=num_segments)
        .map(|i| {
            let angle = start_angle + sweep * (i as f64 / num_segments as f64);
            Point2D::on_circle(center, radius, angle)
        })
        .collect()
}

/// Sample the arc described by a bulge segment from `p1` to `p2`.
///
/// Returns points starting at `p1` and ending at `p2` (within rounding), all on
/// the arc's circle.
///
/// # Errors
/// * `DegenerateSegment` - `p1` and `p2` coincide
/// * `InvalidInput` - zero or non-finite bulge, or non-positive `degrees_per_segment`
///
/// A zero bulge is a straight edge and must be handled by the caller.
pub fn arc_points_from_bulge(
    p1: Point2D,
    p2: Point2D,
    bulge: f64,
    degrees_per_segment: f64,
) -> SectionResult<Vec<Point2D>> {
    validate_degrees_per_segment(degrees_per_segment)?;
    let spec = ArcSpec::from_bulge(p1, p2, bulge)?;
    Ok(spec.points(degrees_per_segment))
}

pub(crate) fn validate_degrees_per_segment(degrees_per_segment: f64) -> SectionResult<()> {
    if !(degrees_per_segment > 0.0) || !degrees_per_segment.is_finite() {
        return Err(SectionError::invalid_input(
            "degrees_per_segment",
            degrees_per_segment.to_string(),
            "must be a positive, finite angle in degrees",
        ));
    }
    Ok(())
}

/// Direction an arc is traversed from its first to its second endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    CounterClockwise,
    Clockwise,
}

/// A directed polyline edge with a bulge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulgeSegment {
    pub start: Point2D,
    pub end: Point2D,
    pub bulge: f64,
}

impl BulgeSegment {
    pub fn new(start: Point2D, end: Point2D, bulge: f64) -> Self {
        BulgeSegment { start, end, bulge }
    }

    /// A zero bulge encodes a straight edge
    pub fn is_straight(&self) -> bool {
        self.bulge == 0.0
    }

    /// Signed included angle θ = 4·atan(bulge), radians
    pub fn included_angle(&self) -> f64 {
        4.0 * self.bulge.atan()
    }

    pub fn chord_length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn arc_spec(&self) -> SectionResult<ArcSpec> {
        ArcSpec::from_bulge(self.start, self.end, self.bulge)
    }

    /// Points from `start` to `end`; straight edges yield just the two endpoints.
    pub fn discretize(&self, degrees_per_segment: f64) -> SectionResult<Vec<Point2D>> {
        if self.is_straight() {
            return Ok(vec![self.start, self.end]);
        }
        arc_points_from_bulge(self.start, self.end, self.bulge, degrees_per_segment)
    }
}

/// Circle parameters resolved from a bulge segment.
///
/// `end_angle = start_angle + sweep`, where the sweep is negative for
/// clockwise arcs. `start_angle` is the angle of the first endpoint about
/// `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub center: Point2D,
    /// True arc radius (always non-negative)
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub direction: SweepDirection,
    /// Set when rounding made `r² - (u/2)²` negative and the center offset
    /// was clamped to zero
    pub offset_clamped: bool,
}

impl ArcSpec {
    /// Resolve the circle through `p1` and `p2` with the given bulge.
    ///
    /// ```text
    ///   θ = 4·atan(b)              u = |p2 - p1|
    ///   r = u·(b² + 1) / (4b)      a = √(r² - (u/2)²)
    ///   N = (dy, -dx)              unit left-hand normal of the chord
    ///   C = mid ∓ sign(b)·a·N      minus for |θ| ≤ π, plus past a half turn
    /// ```
    pub fn from_bulge(p1: Point2D, p2: Point2D, bulge: f64) -> SectionResult<Self> {
        if bulge == 0.0 || !bulge.is_finite() {
            return Err(SectionError::invalid_input(
                "bulge",
                bulge.to_string(),
                "arc bulge must be non-zero and finite; zero bulge is a straight edge",
            ));
        }

        let chord = distance(p1, p2);
        if chord == 0.0 {
            return Err(SectionError::degenerate_segment(p1.x, p1.y));
        }

        let theta = 4.0 * bulge.atan();
        let radius = chord * (bulge * bulge + 1.0) / (4.0 * bulge);

        let half_chord = chord / 2.0;
        let operand = radius * radius - half_chord * half_chord;
        let offset_clamped = operand < 0.0;
        let offset = if offset_clamped {
            debug!(operand, radius, chord, "center offset clamped to zero");
            0.0
        } else {
            operand.sqrt()
        };

        let dx = (p2.x - p1.x) / chord;
        let dy = (p2.y - p1.y) / chord;
        let (nx, ny) = (dy, -dx);

        let sign = bulge.signum();
        let side = if theta.abs() <= PI { -sign } else { sign };
        let mid = p1.midpoint(p2);
        let center = Point2D::new(mid.x + side * offset * nx, mid.y + side * offset * ny);

        let start_angle = (p1.y - center.y).atan2(p1.x - center.x);
        let end_angle = start_angle + theta;

        trace!(
            radius,
            chord,
            center_x = center.x,
            center_y = center.y,
            "resolved bulge arc"
        );

        Ok(ArcSpec {
            center,
            radius: radius.abs(),
            start_angle,
            end_angle,
            direction: if bulge > 0.0 {
                SweepDirection::CounterClockwise
            } else {
                SweepDirection::Clockwise
            },
            offset_clamped,
        })
    }

    /// Signed sweep in radians (negative when clockwise)
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Sample the arc from its first endpoint to its second.
    ///
    /// Clockwise arcs are sampled over the same angular interval in the
    /// increasing-angle sense, then reversed, so both directions produce the
    /// same points.
    pub fn points(&self, degrees_per_segment: f64) -> Vec<Point2D> {
        match self.direction {
            SweepDirection::CounterClockwise => arc_points(
                self.start_angle,
                self.end_angle,
                self.radius,
                self.center,
                degrees_per_segment,
            ),
            SweepDirection::Clockwise => {
                let mut points = arc_points(
                    self.end_angle,
                    self.start_angle,
                    self.radius,
                    self.center,
                    degrees_per_segment,
                );
                points.reverse();
                points
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_distance() {
        assert_eq!(distance(Point2D::new(1.0, 1.0), Point2D::new(4.0, 5.0)), 5.0);
        assert_eq!(distance(Point2D::new(2.0, 2.0), Point2D::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_arc_points_quarter_circle() {
        let points = arc_points(0.0, FRAC_PI_2, 2.0, Point2D::new(1.0, 1.0), 45.0);
        assert_eq!(points.len(), 3);
        assert!(points[0].approx_eq(Point2D::new(3.0, 1.0), TOL));
        assert!(points[2].approx_eq(Point2D::new(1.0, 3.0), TOL));
    }

    #[test]
    fn test_arc_points_wraps_end_angle() {
        // 350° -> 10° walks through 0°, not backwards through 180°
        let points = arc_points(350f64.to_radians(), 10f64.to_radians(), 1.0, Point2D::default(), 10.0);
        assert_eq!(points.len(), 3);
        assert!(points[1].approx_eq(Point2D::new(1.0, 0.0), TOL));
    }

    #[test]
    fn test_arc_points_zero_sweep() {
        let points = arc_points(0.7, 0.7, 3.0, Point2D::new(-1.0, 2.0), 10.0);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], points[1]);
        assert!((distance(points[0], Point2D::new(-1.0, 2.0)) - 3.0).abs() < TOL);
    }

    #[test]
    fn test_arc_points_zero_radius_clusters_at_center() {
        let center = Point2D::new(4.0, 4.0);
        let points = arc_points(0.0, PI, 0.0, center, 30.0);
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| *p == center));
    }

    #[test]
    fn test_semicircle_from_bulge() {
        let spec = ArcSpec::from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), 1.0).unwrap();
        assert!(spec.center.approx_eq(Point2D::new(5.0, 0.0), TOL));
        assert!((spec.radius - 5.0).abs() < TOL);
        assert!((spec.sweep() - PI).abs() < TOL);
        assert_eq!(spec.direction, SweepDirection::CounterClockwise);

        let points = spec.points(90.0);
        assert_eq!(points.len(), 3);
        assert!(points[0].approx_eq(Point2D::new(0.0, 0.0), 1e-6));
        // Counter-clockwise from (0,0) to (10,0) passes below the chord
        assert!(points[1].approx_eq(Point2D::new(5.0, -5.0), 1e-6));
        assert!(points[2].approx_eq(Point2D::new(10.0, 0.0), 1e-6));
    }

    #[test]
    fn test_clockwise_semicircle_passes_above_chord() {
        let points =
            arc_points_from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), -1.0, 90.0).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].approx_eq(Point2D::new(0.0, 0.0), 1e-6));
        assert!(points[1].approx_eq(Point2D::new(5.0, 5.0), 1e-6));
        assert!(points[2].approx_eq(Point2D::new(10.0, 0.0), 1e-6));
    }

    #[test]
    fn test_quarter_circle_from_bulge() {
        let bulge = (PI / 8.0).tan();
        let spec = ArcSpec::from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), bulge).unwrap();
        assert!((spec.radius - 50f64.sqrt()).abs() < 1e-9);
        assert!(spec.center.approx_eq(Point2D::new(5.0, 5.0), 1e-9));

        let points = spec.points(10.0);
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn test_major_arc_center_flips_side() {
        // bulge 2 sweeps ~253.7°, more than a half turn
        let spec = ArcSpec::from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), 2.0).unwrap();
        assert!(spec.center.approx_eq(Point2D::new(5.0, -3.75), 1e-9));
        assert!((spec.radius - 6.25).abs() < 1e-9);

        let points = spec.points(10.0);
        assert!(points.last().unwrap().approx_eq(Point2D::new(10.0, 0.0), 1e-6));
    }

    #[test]
    fn test_near_semicircle_clamps_center_offset() {
        // r² - (u/2)² rounds to a tiny negative value for this bulge
        let bulge = 1.0 - 12.0 * (f64::EPSILON / 2.0);
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(10.0, 0.0);

        let spec = ArcSpec::from_bulge(p1, p2, bulge).unwrap();
        assert!(spec.offset_clamped);
        assert!(spec.center.approx_eq(Point2D::new(5.0, 0.0), TOL));

        let points = arc_points_from_bulge(p1, p2, bulge, 10.0).unwrap();
        assert!(points[0].approx_eq(p1, 1e-6));
        assert!(points[points.len() - 1].approx_eq(p2, 1e-6));

        let exact = ArcSpec::from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), 0.5).unwrap();
        assert!(!exact.offset_clamped);
    }

    #[test]
    fn test_coincident_endpoints_rejected() {
        let err = arc_points_from_bulge(Point2D::new(0.0, 0.0), Point2D::new(0.0, 0.0), 0.5, 10.0).unwrap_err();
        assert_eq!(err, SectionError::degenerate_segment(0.0, 0.0));
    }

    #[test]
    fn test_zero_bulge_rejected() {
        let err = ArcSpec::from_bulge(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), 0.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_degrees_per_segment_rejected() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(1.0, 0.0);
        assert!(arc_points_from_bulge(p1, p2, 0.5, 0.0).is_err());
        assert!(arc_points_from_bulge(p1, p2, 0.5, -5.0).is_err());
        assert!(arc_points_from_bulge(p1, p2, 0.5, f64::NAN).is_err());
    }

    #[test]
    fn test_straight_segment_discretizes_to_endpoints() {
        let segment = BulgeSegment::new(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0), 0.0);
        assert!(segment.is_straight());
        assert_eq!(segment.chord_length(), 5.0);
        assert_eq!(segment.discretize(10.0).unwrap(), vec![segment.start, segment.end]);
    }

    #[test]
    fn test_segment_included_angle() {
        let segment = BulgeSegment::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), -1.0);
        assert!((segment.included_angle() + PI).abs() < TOL);
        assert_eq!(segment.arc_spec().unwrap().direction, SweepDirection::Clockwise);
    }
}
