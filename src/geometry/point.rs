//! 2D point types.
//!
//! [`Point`] carries scaled integer coordinates; [`PointF`] carries unscaled
//! floating-point coordinates for direction vectors and intermediate math.

use crate::{scale, Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A 2D point with scaled integer coordinates.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

/// Type alias for a collection of points.
pub type Points = Vec<Point>;

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Create a point from floating-point coordinates in mm.
    #[inline]
    pub fn new_scale(x: CoordF, y: CoordF) -> Self {
        Self {
            x: scale(x),
            y: scale(y),
        }
    }

    /// Convert to a floating-point point.
    #[inline]
    pub fn to_f64(self) -> PointF {
        PointF::new(self.x as CoordF, self.y as CoordF)
    }

    /// Squared euclidean distance to another point, exact in i128.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> i128 {
        let dx = (other.x - self.x) as i128;
        let dy = (other.y - self.y) as i128;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> CoordF {
        (self.distance_squared(other) as CoordF).sqrt()
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Point) -> i128 {
        self.x as i128 * other.x as i128 + self.y as i128 * other.y as i128
    }

    /// Cross product (z-component) with another vector.
    #[inline]
    pub fn cross(&self, other: &Point) -> i128 {
        self.x as i128 * other.y as i128 - self.y as i128 * other.x as i128
    }

    /// Squared length of this point treated as a vector.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.dot(self)
    }

    /// Rotate around the origin by `angle` radians, rounding to the nearest
    /// integer coordinate.
    #[inline]
    pub fn rotate(&mut self, angle: CoordF) {
        *self = self.rotated(angle);
    }

    /// Return this point rotated around the origin by `angle` radians.
    #[inline]
    pub fn rotated(&self, angle: CoordF) -> Self {
        let (s, c) = angle.sin_cos();
        let x = self.x as CoordF;
        let y = self.y as CoordF;
        Self {
            x: (c * x - s * y).round() as Coord,
            y: (c * y + s * x).round() as Coord,
        }
    }

    /// Midpoint between this point and another.
    #[inline]
    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D point with floating-point coordinates.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: CoordF,
    pub y: CoordF,
}

impl PointF {
    /// Create a new floating-point point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF) -> Self {
        Self { x, y }
    }

    /// Euclidean length of this point treated as a vector.
    #[inline]
    pub fn length(&self) -> CoordF {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Perpendicular vector (rotated 90° counter-clockwise).
    #[inline]
    pub fn perp(&self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl Sub for PointF {
    type Output = PointF;
    #[inline]
    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Debug for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.distance_squared(&b), 25);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Point::new(1000, 0);
        let r = p.rotated(PI / 2.0);
        assert_eq!(r, Point::new(0, 1000));

        let back = r.rotated(-PI / 2.0);
        assert_eq!(back, p);
    }

    #[test]
    fn test_midpoint() {
        let a = Point::new(0, 0);
        let b = Point::new(100, 50);
        assert_eq!(a.midpoint(&b), Point::new(50, 25));
    }

    #[test]
    fn test_cross_sign() {
        let v1 = Point::new(1, 0);
        let v2 = Point::new(0, 1);
        assert_eq!(v1.cross(&v2), 1);
        assert_eq!(v2.cross(&v1), -1);
    }
}
