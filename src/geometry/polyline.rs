//! Polyline type for open paths.

use super::{Line, Lines, Point, Points, Polygon};
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// An open ordered sequence of points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polyline {
    points: Points,
}

/// Type alias for a collection of polylines.
pub type Polylines = Vec<Polyline>;

impl Polyline {
    /// Create an empty polyline.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a polyline from a sequence of points.
    #[inline]
    pub fn from_points(points: Points) -> Self {
        Self { points }
    }

    /// Create a polyline from a polygon ring, repeating the first point at
    /// the end so the closing edge is part of the path.
    pub fn from_polygon(polygon: &Polygon) -> Self {
        let mut points = polygon.points().to_vec();
        if !points.is_empty() && points.first() != points.last() {
            points.push(points[0]);
        }
        Self { points }
    }

    /// Get the points of this polyline.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point. Panics on an empty polyline.
    #[inline]
    pub fn first_point(&self) -> Point {
        self.points[0]
    }

    /// Last point. Panics on an empty polyline.
    #[inline]
    pub fn last_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// The segments of the path.
    pub fn lines(&self) -> Lines {
        if self.points.len() < 2 {
            return Vec::new();
        }
        self.points
            .windows(2)
            .map(|w| Line::new(w[0], w[1]))
            .collect()
    }

    /// Total path length in scaled units.
    pub fn length(&self) -> CoordF {
        self.points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Whether the first and last points coincide.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_polygon_closes_ring() {
        let poly = Polygon::rectangle(Point::new(0, 0), Point::new(100, 100));
        let polyline = Polyline::from_polygon(&poly);
        assert_eq!(polyline.len(), 5);
        assert!(polyline.is_closed());
        assert_eq!(polyline.lines().len(), 4);
    }

    #[test]
    fn test_lines() {
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
        ]);
        let lines = polyline.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Line::new(Point::new(0, 0), Point::new(100, 0)));
        assert_eq!(lines[1], Line::new(Point::new(100, 0), Point::new(100, 100)));
    }

    #[test]
    fn test_length() {
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(300, 400),
            Point::new(300, 500),
        ]);
        assert!((polyline.length() - 600.0).abs() < 1e-9);
    }
}
