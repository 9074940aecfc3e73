//! Line segment type.

use super::{Point, PointF};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

/// Type alias for a collection of lines.
pub type Lines = Vec<Line>;

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Get the direction vector (b - a).
    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Get the direction vector as floating-point.
    #[inline]
    pub fn direction_f(&self) -> PointF {
        self.b.to_f64() - self.a.to_f64()
    }

    /// Get the direction angle in radians, normalized to `[0, PI)`.
    /// Lines have no orientation for bridging purposes, so opposite
    /// directions map to the same angle.
    #[inline]
    pub fn direction_angle(&self) -> CoordF {
        let dir = self.direction();
        let mut angle = (dir.y as CoordF).atan2(dir.x as CoordF);
        if angle < 0.0 {
            angle += std::f64::consts::PI;
        }
        if angle >= std::f64::consts::PI {
            angle -= std::f64::consts::PI;
        }
        angle
    }

    /// Get the midpoint of the line segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        self.a.midpoint(&self.b)
    }

    /// Get the squared length of the line segment, exact in i128.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.a.distance_squared(&self.b)
    }

    /// Get the length of the line segment in scaled units.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.a.distance(&self.b)
    }

    /// Check if this line segment is degenerate (zero length).
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_direction_angle_normalization() {
        // Pointing right and pointing left are the same direction.
        let right = Line::new(Point::new(0, 0), Point::new(100, 0));
        let left = Line::new(Point::new(100, 0), Point::new(0, 0));
        assert!((right.direction_angle() - left.direction_angle()).abs() < 1e-12);
        assert!(right.direction_angle().abs() < 1e-12);

        // Straight up is PI/2.
        let up = Line::new(Point::new(0, 0), Point::new(0, 100));
        assert!((up.direction_angle() - PI / 2.0).abs() < 1e-12);

        // Down maps back into [0, PI).
        let down = Line::new(Point::new(0, 100), Point::new(0, 0));
        assert!((down.direction_angle() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_length() {
        let line = Line::new(Point::new(0, 0), Point::new(300, 400));
        assert_eq!(line.length_squared(), 250_000);
        assert!((line.length() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint() {
        let line = Line::new(Point::new(0, 0), Point::new(100, 200));
        assert_eq!(line.midpoint(), Point::new(50, 100));
    }
}
