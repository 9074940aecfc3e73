//! Closed polygon type.

use super::{BoundingBox, Line, Lines, Point, Points};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};

/// A closed polygon: a ring of points with an implicit closing edge.
///
/// Orientation convention: outer contours are counter-clockwise, holes are
/// clockwise. The polygon algebra preserves this; nothing here reorients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Points,
}

/// Type alias for a collection of polygons.
pub type Polygons = Vec<Polygon>;

impl Polygon {
    /// Create an empty polygon.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a polygon from a point ring. The ring must not repeat the
    /// first point at the end; the closing edge is implicit.
    #[inline]
    pub fn from_points(points: Points) -> Self {
        Self { points }
    }

    /// Create an axis-aligned rectangle from two opposite corners.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self {
            points: vec![
                Point::new(min.x, min.y),
                Point::new(max.x, min.y),
                Point::new(max.x, max.y),
                Point::new(min.x, max.y),
            ],
        }
    }

    /// Get the points of this polygon.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get a mutable reference to the points.
    #[inline]
    pub fn points_mut(&mut self) -> &mut Points {
        &mut self.points
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the boundary edges, including the implicit closing edge.
    pub fn edges(&self) -> Lines {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| Line::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }

    /// Signed area in scaled units squared (positive for CCW rings).
    pub fn area(&self) -> CoordF {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc: i128 = 0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            acc += p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128;
        }
        acc as CoordF / 2.0
    }

    /// Axis-aligned bounding box of the ring.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Test whether a point lies inside the ring (even-odd rule).
    ///
    /// The crossing test is half-open: points on the lower/left boundary
    /// count as inside, points on the upper/right boundary as outside, so
    /// adjacent rings never both claim a shared point.
    pub fn contains(&self, p: &Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > p.y) != (pj.y > p.y) {
                let dx = (pj.x - pi.x) as f64;
                let dy = (pj.y - pi.y) as f64;
                let x_cross = pi.x as f64 + dx * (p.y - pi.y) as f64 / dy;
                if (p.x as f64) < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Rotate around the origin by `angle` radians.
    pub fn rotate(&mut self, angle: CoordF) {
        for p in &mut self.points {
            p.rotate(angle);
        }
    }

    /// Return a copy rotated around the origin by `angle` radians.
    pub fn rotated(&self, angle: CoordF) -> Self {
        let mut clone = self.clone();
        clone.rotate(angle);
        clone
    }

    /// Minimum and maximum x coordinate of the ring, if any.
    pub fn x_extents(&self) -> Option<(Coord, Coord)> {
        let first = self.points.first()?;
        let mut min_x = first.x;
        let mut max_x = first.x;
        for p in &self.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
        }
        Some((min_x, max_x))
    }
}

impl From<Points> for Polygon {
    fn from(points: Points) -> Self {
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn square(size: Coord) -> Polygon {
        Polygon::rectangle(Point::new(0, 0), Point::new(size, size))
    }

    #[test]
    fn test_area() {
        assert!((square(1000).area() - 1_000_000.0).abs() < 1e-6);

        // Clockwise ring has negative area.
        let mut cw = square(1000);
        cw.points_mut().reverse();
        assert!((cw.area() + 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains() {
        let poly = square(1000);
        assert!(poly.contains(&Point::new(500, 500)));
        assert!(!poly.contains(&Point::new(1500, 500)));
        assert!(!poly.contains(&Point::new(500, -1)));

        // Half-open boundary: bottom-left in, top-right out.
        assert!(poly.contains(&Point::new(500, 0)));
        assert!(!poly.contains(&Point::new(500, 1000)));
    }

    #[test]
    fn test_contains_concave() {
        // A U-shape; the notch interior is outside.
        let poly = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(3000, 0),
            Point::new(3000, 2000),
            Point::new(2000, 2000),
            Point::new(2000, 500),
            Point::new(1000, 500),
            Point::new(1000, 2000),
            Point::new(0, 2000),
        ]);
        assert!(poly.contains(&Point::new(500, 1000)));
        assert!(poly.contains(&Point::new(2500, 1000)));
        assert!(!poly.contains(&Point::new(1500, 1000)));
        assert!(poly.contains(&Point::new(1500, 250)));
    }

    #[test]
    fn test_edges_close_the_ring() {
        let poly = square(1000);
        let edges = poly.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].b, poly.points()[0]);
    }

    #[test]
    fn test_rotate_round_trip() {
        let poly = square(1000);
        let rotated = poly.rotated(PI / 2.0).rotated(-PI / 2.0);
        assert_eq!(poly, rotated);
    }
}
