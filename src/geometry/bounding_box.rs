//! Axis-aligned bounding box.

use super::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box over scaled integer coordinates.
///
/// An empty box is `defined == false`; merging the first point defines it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
    pub defined: bool,
}

impl BoundingBox {
    /// Create an undefined (empty) bounding box.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bounding box from a set of points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bbox = Self::new();
        for p in points {
            bbox.merge_point(*p);
        }
        bbox
    }

    /// Expand the box to include a point.
    pub fn merge_point(&mut self, p: Point) {
        if !self.defined {
            self.min = p;
            self.max = p;
            self.defined = true;
        } else {
            self.min.x = self.min.x.min(p.x);
            self.min.y = self.min.y.min(p.y);
            self.max.x = self.max.x.max(p.x);
            self.max.y = self.max.y.max(p.y);
        }
    }

    /// Check whether a point lies inside the box (boundary inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        self.defined
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_point() {
        let mut bbox = BoundingBox::new();
        assert!(!bbox.defined);

        bbox.merge_point(Point::new(0, 0));
        assert!(bbox.defined);
        assert_eq!(bbox.min, Point::new(0, 0));
        assert_eq!(bbox.max, Point::new(0, 0));

        bbox.merge_point(Point::new(100, 200));
        bbox.merge_point(Point::new(-50, 100));
        assert_eq!(bbox.min, Point::new(-50, 0));
        assert_eq!(bbox.max, Point::new(100, 200));
    }

    #[test]
    fn test_contains() {
        let bbox = BoundingBox::from_points(&[Point::new(0, 0), Point::new(100, 100)]);
        assert!(bbox.contains(&Point::new(50, 50)));
        assert!(bbox.contains(&Point::new(0, 100)));
        assert!(!bbox.contains(&Point::new(101, 50)));

        let empty = BoundingBox::new();
        assert!(!empty.contains(&Point::new(0, 0)));
    }

    #[test]
    fn test_center() {
        let bbox = BoundingBox::from_points(&[Point::new(0, 0), Point::new(100, 200)]);
        assert_eq!(bbox.center(), Point::new(50, 100));
    }
}
