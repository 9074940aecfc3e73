//! ExPolygon: a simply-connected region with holes.

use super::{BoundingBox, Lines, Point, Polygon, Polygons, Polyline, Polylines};
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// A planar region bounded by one outer contour (CCW) and zero or more hole
/// contours (CW).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExPolygon {
    pub contour: Polygon,
    pub holes: Polygons,
}

/// Type alias for a collection of ExPolygons.
pub type ExPolygons = Vec<ExPolygon>;

impl ExPolygon {
    /// Create an ExPolygon without holes.
    #[inline]
    pub fn new(contour: Polygon) -> Self {
        Self {
            contour,
            holes: Vec::new(),
        }
    }

    /// Create an ExPolygon with holes.
    #[inline]
    pub fn with_holes(contour: Polygon, holes: Polygons) -> Self {
        Self { contour, holes }
    }

    /// Whether the region is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contour.is_empty()
    }

    /// Region area in scaled units squared (contour minus holes).
    pub fn area(&self) -> CoordF {
        let mut area = self.contour.area().abs();
        for hole in &self.holes {
            area -= hole.area().abs();
        }
        area
    }

    /// Test whether a point lies inside the region: inside the contour and
    /// outside every hole.
    pub fn contains_point(&self, p: &Point) -> bool {
        if !self.contour.contains(p) {
            return false;
        }
        !self.holes.iter().any(|hole| hole.contains(p))
    }

    /// Axis-aligned bounding box of the outer contour.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.contour.bounding_box()
    }

    /// Rotate around the origin by `angle` radians.
    pub fn rotate(&mut self, angle: CoordF) {
        self.contour.rotate(angle);
        for hole in &mut self.holes {
            hole.rotate(angle);
        }
    }

    /// Return a copy rotated around the origin by `angle` radians.
    pub fn rotated(&self, angle: CoordF) -> Self {
        let mut clone = self.clone();
        clone.rotate(angle);
        clone
    }

    /// All boundary rings (contour first, then holes) as closed polylines.
    pub fn to_polylines(&self) -> Polylines {
        let mut out = Vec::with_capacity(1 + self.holes.len());
        out.push(Polyline::from_polygon(&self.contour));
        for hole in &self.holes {
            out.push(Polyline::from_polygon(hole));
        }
        out
    }

    /// All boundary rings as individual polygons (contour first).
    pub fn to_polygons(&self) -> Polygons {
        let mut out = Vec::with_capacity(1 + self.holes.len());
        out.push(self.contour.clone());
        out.extend(self.holes.iter().cloned());
        out
    }

    /// All boundary segments, including each ring's closing edge.
    pub fn to_lines(&self) -> Lines {
        let mut out = self.contour.edges();
        for hole in &self.holes {
            out.extend(hole.edges());
        }
        out
    }

    /// All vertices of contour and holes.
    pub fn all_points(&self) -> Vec<Point> {
        let mut out = self.contour.points().to_vec();
        for hole in &self.holes {
            out.extend_from_slice(hole.points());
        }
        out
    }
}

impl From<Polygon> for ExPolygon {
    fn from(contour: Polygon) -> Self {
        Self::new(contour)
    }
}

/// Boundary polylines of every region in the set.
pub fn to_polylines(expolygons: &[ExPolygon]) -> Polylines {
    expolygons.iter().flat_map(|ex| ex.to_polylines()).collect()
}

/// Boundary rings of every region in the set, as polygons.
pub fn to_polygons(expolygons: &[ExPolygon]) -> Polygons {
    expolygons.iter().flat_map(|ex| ex.to_polygons()).collect()
}

/// Boundary segments of every region in the set.
pub fn to_lines(expolygons: &[ExPolygon]) -> Lines {
    expolygons.iter().flat_map(|ex| ex.to_lines()).collect()
}

/// Test whether any region in the set contains the point.
pub fn expolygons_contain(expolygons: &[ExPolygon], p: &Point) -> bool {
    expolygons.iter().any(|ex| ex.contains_point(p))
}

/// Split polylines into individual two-point segments.
pub fn polylines_to_lines(polylines: &[Polyline]) -> Lines {
    polylines.iter().flat_map(|pl| pl.lines()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_hole() -> ExPolygon {
        let outer = Polygon::rectangle(Point::new(0, 0), Point::new(4000, 4000));
        let mut hole = Polygon::rectangle(Point::new(1000, 1000), Point::new(3000, 3000));
        hole.points_mut().reverse();
        ExPolygon::with_holes(outer, vec![hole])
    }

    #[test]
    fn test_contains_point_with_hole() {
        let frame = frame_with_hole();
        assert!(frame.contains_point(&Point::new(500, 500)));
        assert!(!frame.contains_point(&Point::new(2000, 2000)));
        assert!(!frame.contains_point(&Point::new(5000, 5000)));
    }

    #[test]
    fn test_area_subtracts_holes() {
        let frame = frame_with_hole();
        // 4000² - 2000² = 12_000_000
        assert!((frame.area() - 12_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_polylines_counts_rings() {
        let frame = frame_with_hole();
        let polylines = frame.to_polylines();
        assert_eq!(polylines.len(), 2);
        assert!(polylines.iter().all(|pl| pl.is_closed()));
    }

    #[test]
    fn test_to_lines_includes_closing_edges() {
        let frame = frame_with_hole();
        assert_eq!(frame.to_lines().len(), 8);
    }
}
