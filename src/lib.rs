//! # Bridge Detector
//!
//! Bridge detection and coverage analysis for FDM slicing.
//!
//! Given a horizontal region that must be printed over empty space and the
//! solid regions of the layer below it, this library decides:
//! - whether the region can be printed as a bridge at all,
//! - the optimal extrusion direction across the void,
//! - which portion of the region is effectively supported at that direction,
//! - which boundary edges remain unsupported.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bridge_detector::{BridgeDetector, ExPolygon};
//!
//! let mut detector = BridgeDetector::new(regions, lower_slices, spacing);
//! if detector.detect_angle(None) {
//!     let supported = detector.coverage(None, false);
//!     let loose = detector.unsupported_edges(None);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! All geometry uses scaled integer coordinates to avoid floating-point
//! precision issues. Coordinates are scaled by `SCALING_FACTOR` (1,000,000),
//! so 1 unit = 1 nanometer. The detection algorithms themselves are agnostic
//! to the scale factor; only `scale()`/`unscale()` bake it in.

pub mod bridge;
pub mod clipper;
pub mod geometry;

pub use bridge::{
    detect_bridges, directions_parallel, Bridge, BridgeConfig, BridgeDetector, BridgeDirection,
};
pub use clipper::{
    diff_ex, diff_pl, intersection_ex, intersection_ln, intersection_pl, offset2_ex, offset_ex,
    offset_expolygons, union_ex, union_polygons, union_safety_offset_ex, OffsetJoinType,
};
pub use geometry::{
    BoundingBox, ExPolygon, ExPolygons, Line, Lines, Point, PointF, Points, Polygon, Polygons,
    Polyline, Polylines,
};

/// Coordinate type used throughout the crate.
/// Using i64 for integer coordinates (scaled by SCALING_FACTOR) to avoid
/// floating-point issues in the polygon algebra.
pub type Coord = i64;

/// Floating-point coordinate type for unscaled values.
pub type CoordF = f64;

/// Scaling factor: coordinates are stored as integers scaled by this factor.
/// 1 unit = 1 nanometer, so 1mm = 1_000_000 units.
pub const SCALING_FACTOR: f64 = 1_000_000.0;

/// The smallest distance the kernel considers meaningful, in scaled units.
/// Also used as the safety offset that keeps Clipper from returning empty
/// results on strictly coincident edges.
pub const SCALED_EPSILON: Coord = 100;

/// Scale a floating-point coordinate (mm) to integer units.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Unscale an integer coordinate to floating-point (mm).
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bridge detection operations.
///
/// The detector itself never fails: "no anchors", "unbridgeable" and "no
/// angle chosen" are ordinary outcomes reported through return values. This
/// error covers parameter validation on the convenience API only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid line spacing {0}: spacing must be positive")]
    InvalidSpacing(Coord),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
