//! Expanding bulge-tagged polyline vertices into plain point rings.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::arc::{validate_degrees_per_segment, BulgeSegment};
use super::Point2D;
use crate::errors::{SectionError, SectionResult};

/// A polyline vertex; `bulge` describes the edge to the next vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BulgeVertex {
    pub point: Point2D,
    #[serde(default)]
    pub bulge: f64,
}

impl BulgeVertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        BulgeVertex {
            point: Point2D::new(x, y),
            bulge,
        }
    }

    pub fn straight(x: f64, y: f64) -> Self {
        BulgeVertex::new(x, y, 0.0)
    }
}

/// Result of expanding a bulge polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandedRing {
    /// Boundary points. For closed input the first point is not repeated.
    pub points: Vec<Point2D>,
    /// Arc segments dropped because their endpoints coincide
    pub skipped_segments: usize,
}

/// Replace every bulge edge with its discretized arc.
///
/// Consecutive segments share their endpoint, so each segment contributes all
/// of its points except the first. Zero-length straight edges collapse.
/// Arc segments with coincident endpoints are skipped with a warning and
/// counted in [`ExpandedRing::skipped_segments`].
pub fn expand_bulge_ring(
    vertices: &[BulgeVertex],
    closed: bool,
    degrees_per_segment: f64,
) -> SectionResult<ExpandedRing> {
    validate_degrees_per_segment(degrees_per_segment)?;

    let mut ring = ExpandedRing::default();
    let Some(first) = vertices.first() else {
        return Ok(ring);
    };
    ring.points.push(first.point);

    let edge_count = match (closed, vertices.len()) {
        (_, 0 | 1) => 0,
        (true, n) => n,
        (false, n) => n - 1,
    };

    for i in 0..edge_count {
        let from = vertices[i];
        let to = vertices[(i + 1) % vertices.len()];
        let segment = BulgeSegment::new(from.point, to.point, from.bulge);

        let points = match segment.discretize(degrees_per_segment) {
            Ok(points) => points,
            Err(SectionError::DegenerateSegment { x, y }) => {
                warn!(x, y, bulge = from.bulge, "skipping arc segment with coincident endpoints");
                ring.skipped_segments += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for point in points.into_iter().skip(1) {
            if ring.points.last() != Some(&point) {
                ring.points.push(point);
            }
        }
    }

    if closed && ring.points.len() > 1 {
        // The closing edge ends where the ring started
        ring.points.pop();
    }

    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::ring_signed_area;
    use std::f64::consts::PI;

    #[test]
    fn test_straight_square() {
        let vertices = [
            BulgeVertex::straight(0.0, 0.0),
            BulgeVertex::straight(10.0, 0.0),
            BulgeVertex::straight(10.0, 10.0),
            BulgeVertex::straight(0.0, 10.0),
        ];
        let ring = expand_bulge_ring(&vertices, true, 10.0).unwrap();
        assert_eq!(ring.points.len(), 4);
        assert_eq!(ring.skipped_segments, 0);
        assert_eq!(ring_signed_area(&ring.points), 100.0);
    }

    #[test]
    fn test_slot_with_semicircular_ends() {
        // 20 x 10 rectangle with semicircles on both short ends, counter-clockwise
        let vertices = [
            BulgeVertex::straight(0.0, 0.0),
            BulgeVertex::new(20.0, 0.0, 1.0),
            BulgeVertex::straight(20.0, 10.0),
            BulgeVertex::new(0.0, 10.0, 1.0),
        ];
        let ring = expand_bulge_ring(&vertices, true, 5.0).unwrap();

        // Two semicircles of 36 chords each add 35 interior points apiece
        assert_eq!(ring.points.len(), 4 + 2 * 35);
        let exact = 200.0 + PI * 25.0;
        let area = ring_signed_area(&ring.points);
        assert!(area > 0.0);
        assert!((area - exact).abs() / exact < 0.005);
    }

    #[test]
    fn test_open_polyline_keeps_both_ends() {
        let vertices = [BulgeVertex::new(0.0, 0.0, 1.0), BulgeVertex::straight(10.0, 0.0)];
        let ring = expand_bulge_ring(&vertices, false, 90.0).unwrap();
        assert_eq!(ring.points.len(), 3);
        assert!(ring.points[2].approx_eq(Point2D::new(10.0, 0.0), 1e-9));
    }

    #[test]
    fn test_degenerate_arc_segment_is_skipped() {
        let vertices = [
            BulgeVertex::straight(0.0, 0.0),
            BulgeVertex::new(10.0, 0.0, 0.5),
            BulgeVertex::straight(10.0, 0.0),
            BulgeVertex::straight(10.0, 10.0),
        ];
        let ring = expand_bulge_ring(&vertices, true, 10.0).unwrap();
        assert_eq!(ring.skipped_segments, 1);
        assert_eq!(ring.points.len(), 3);
    }

    #[test]
    fn test_repeated_vertex_collapses() {
        let vertices = [
            BulgeVertex::straight(0.0, 0.0),
            BulgeVertex::straight(5.0, 0.0),
            BulgeVertex::straight(5.0, 0.0),
            BulgeVertex::straight(5.0, 5.0),
        ];
        let ring = expand_bulge_ring(&vertices, true, 10.0).unwrap();
        assert_eq!(ring.points.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let ring = expand_bulge_ring(&[], true, 10.0).unwrap();
        assert!(ring.points.is_empty());
        assert!(expand_bulge_ring(&[], true, 0.0).is_err());
    }
}
