//! Rings and polygons with holes.
//!
//! A ring is a slice of [`Point2D`] that is implicitly closed: the last point
//! connects back to the first and is not repeated.

use serde::{Deserialize, Serialize};

use super::Point2D;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a set of points, `None` when empty
    pub fn of_points(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Signed shoelace area; positive for counter-clockwise rings.
pub fn ring_signed_area(ring: &[Point2D]) -> f64 {
    edges(ring).map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>() / 2.0
}

/// Length of the closed ring, including the closing edge.
pub fn ring_length(ring: &[Point2D]) -> f64 {
    edges(ring).map(|(a, b)| a.distance_to(b)).sum()
}

/// Even-odd (ray casting) point-in-ring test.
pub fn ring_contains(ring: &[Point2D], point: Point2D) -> bool {
    let mut inside = false;
    for (a, b) in edges(ring) {
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Iterate the edges of an implicitly closed ring.
pub(crate) fn edges(ring: &[Point2D]) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
    let n = ring.len();
    let count = if n < 2 { 0 } else { n };
    (0..count).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// A region bounded by one exterior ring with zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point2D>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<Point2D>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point2D>) -> Self {
        Polygon {
            exterior,
            holes: Vec::new(),
        }
    }

    pub fn with_hole(mut self, hole: Vec<Point2D>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Net area: exterior minus holes, independent of ring orientation
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| ring_signed_area(h).abs()).sum();
        ring_signed_area(&self.exterior).abs() - holes
    }

    /// Length of the exterior ring
    pub fn perimeter(&self) -> f64 {
        ring_length(&self.exterior)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.exterior).unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }
}

/// Group closed rings into polygons by nesting depth.
///
/// Rings are placed from largest to smallest area. Each ring's container is
/// the smallest already-placed ring enclosing its vertices. Rings at even depth
/// become exteriors; rings at odd depth become holes of their container's
/// polygon. Exteriors are normalized counter-clockwise and holes clockwise.
pub fn assemble_polygons(rings: Vec<Vec<Point2D>>) -> Vec<Polygon> {
    let mut order: Vec<usize> = (0..rings.len()).filter(|&i| rings[i].len() >= 3).collect();
    let areas: Vec<f64> = rings.iter().map(|r| ring_signed_area(r).abs()).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    // (ring index, depth, owning polygon index)
    let mut placed: Vec<(usize, usize, usize)> = Vec::with_capacity(order.len());
    let mut polygons: Vec<Polygon> = Vec::new();

    for &idx in &order {
        let ring = &rings[idx];
        let container = placed
            .iter()
            .rev()
            .find(|(other, _, _)| encloses(&rings[*other], ring))
            .copied();

        match container {
            Some((_, depth, owner)) if depth % 2 == 0 => {
                polygons[owner].holes.push(oriented(ring, false));
                placed.push((idx, depth + 1, owner));
            }
            Some((_, depth, _)) => {
                polygons.push(Polygon::new(oriented(ring, true)));
                placed.push((idx, depth + 1, polygons.len() - 1));
            }
            None => {
                polygons.push(Polygon::new(oriented(ring, true)));
                placed.push((idx, 0, polygons.len() - 1));
            }
        }
    }

    polygons
}

/// `outer` encloses `inner` when the majority of `inner`'s vertices lie inside it.
fn encloses(outer: &[Point2D], inner: &[Point2D]) -> bool {
    let inside = inner.iter().filter(|p| ring_contains(outer, **p)).count();
    inside * 2 > inner.len()
}

fn oriented(ring: &[Point2D], counter_clockwise: bool) -> Vec<Point2D> {
    let mut ring = ring.to_vec();
    if (ring_signed_area(&ring) > 0.0) != counter_clockwise {
        ring.reverse();
    }
    ring
}
