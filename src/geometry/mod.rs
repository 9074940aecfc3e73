//! Geometry primitives for bridge detection.
//!
//! This module provides the fundamental geometric types the detection
//! pipeline operates on:
//! - [`Point`] / [`PointF`] - 2D points with integer (scaled) and
//!   floating-point (unscaled) coordinates
//! - [`Line`] - Line segment between two points
//! - [`Polygon`] - Closed ring with an implicit closing edge
//! - [`Polyline`] - Open path
//! - [`ExPolygon`] - Region with holes (outer contour + inner contours)
//! - [`BoundingBox`] - Axis-aligned bounding box
//!
//! ## Coordinate System
//!
//! Scaled integer coordinates are used throughout to avoid floating-point
//! precision issues. Use `scale()` / `unscale()` from the crate root to
//! convert between mm and internal units.

mod bounding_box;
mod expolygon;
mod line;
mod point;
mod polygon;
mod polyline;

pub use bounding_box::BoundingBox;
pub use expolygon::{
    expolygons_contain, polylines_to_lines, to_lines, to_polygons, to_polylines, ExPolygon,
    ExPolygons,
};
pub use line::{Line, Lines};
pub use point::{Point, PointF, Points};
pub use polygon::{Polygon, Polygons};
pub use polyline::{Polyline, Polylines};
