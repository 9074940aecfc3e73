//! Polygon boolean operations and line clipping.
//!
//! Boolean operations (union, intersection, difference) and offsets are
//! provided by the geo-clipper library; polyline and line clipping is done
//! by exact parametric segment splitting against region boundaries.
//!
//! All operations work directly in scaled integer space: coordinates pass
//! through to Clipper as `f64` with a scale factor of 1.0, so results round
//! back to the same integer grid regardless of the crate's scaling factor.
//! Every operation is total; empty input yields empty output.

use crate::geometry::{
    expolygons_contain, to_polygons, ExPolygon, ExPolygons, Line, Lines, Point, Polygon, Polygons,
    Polyline, Polylines,
};
use crate::{Coord, SCALED_EPSILON};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Scale factor handed to Clipper. Coordinates are already integers.
const CLIPPER_FACTOR: f64 = 1.0;

/// Join type for offset corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetJoinType {
    /// Square corners
    Square,
    /// Round corners
    Round,
    /// Mitered corners (Clipper's default limit)
    #[default]
    Miter,
}

impl From<OffsetJoinType> for JoinType {
    fn from(jt: OffsetJoinType) -> Self {
        match jt {
            OffsetJoinType::Square => JoinType::Square,
            OffsetJoinType::Round => JoinType::Round(SCALED_EPSILON as f64),
            OffsetJoinType::Miter => JoinType::Miter(2.0),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn ring_to_geo(points: &[Point]) -> LineString<f64> {
    let mut ring: Vec<GeoCoord<f64>> = points
        .iter()
        .map(|p| GeoCoord {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(*first);
        }
    }
    LineString::new(ring)
}

fn geo_to_ring(line_string: &LineString<f64>) -> Polygon {
    let mut points: Vec<Point> = line_string
        .coords()
        .map(|c| Point::new(c.x.round() as Coord, c.y.round() as Coord))
        .collect();
    // Our rings keep the closing edge implicit.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Polygon::from_points(points)
}

fn expolygon_to_geo(expoly: &ExPolygon) -> GeoPolygon<f64> {
    let holes = expoly.holes.iter().map(|h| ring_to_geo(h.points())).collect();
    GeoPolygon::new(ring_to_geo(expoly.contour.points()), holes)
}

fn expolygons_to_geo_multi(expolys: &[ExPolygon]) -> MultiPolygon<f64> {
    MultiPolygon::new(expolys.iter().map(expolygon_to_geo).collect())
}

fn geo_to_expolygon(geo_poly: &GeoPolygon<f64>) -> ExPolygon {
    let contour = geo_to_ring(geo_poly.exterior());
    let holes = geo_poly.interiors().iter().map(geo_to_ring).collect();
    ExPolygon::with_holes(contour, holes)
}

fn geo_multi_to_expolygons(multi: &MultiPolygon<f64>) -> ExPolygons {
    multi
        .0
        .iter()
        .map(geo_to_expolygon)
        .filter(|ex| !ex.is_empty())
        .collect()
}

// ============================================================================
// Boolean operations
// ============================================================================

/// Union of two polygon sets.
pub fn union(subject: &[ExPolygon], clip: &[ExPolygon]) -> ExPolygons {
    if subject.is_empty() {
        return clip.to_vec();
    }
    if clip.is_empty() {
        return subject.to_vec();
    }
    let result =
        expolygons_to_geo_multi(subject).union(&expolygons_to_geo_multi(clip), CLIPPER_FACTOR);
    geo_multi_to_expolygons(&result)
}

/// Union of a single set of potentially overlapping regions.
pub fn union_ex(expolygons: &[ExPolygon]) -> ExPolygons {
    match expolygons.len() {
        0 => Vec::new(),
        1 => expolygons.to_vec(),
        _ => {
            let mut result = vec![expolygons[0].clone()];
            for expoly in &expolygons[1..] {
                result = union(&result, std::slice::from_ref(expoly));
            }
            result
        }
    }
}

/// Union of a single set with a tiny safety offset applied first, so that
/// strictly coincident edges still produce a non-empty result downstream.
pub fn union_safety_offset_ex(expolygons: &[ExPolygon]) -> ExPolygons {
    offset_ex(expolygons, SCALED_EPSILON)
}

/// Union of plain polygon rings, returned as rings again (hole rings of the
/// merged result are emitted as separate clockwise polygons).
pub fn union_polygons(polygons: &[Polygon]) -> Polygons {
    let expolys: ExPolygons = polygons
        .iter()
        .map(|p| ExPolygon::new(p.clone()))
        .collect();
    to_polygons(&union_ex(&expolys))
}

/// Intersection of two polygon sets.
pub fn intersection_ex(subject: &[ExPolygon], clip: &[ExPolygon]) -> ExPolygons {
    if subject.is_empty() || clip.is_empty() {
        return Vec::new();
    }
    let result = expolygons_to_geo_multi(subject)
        .intersection(&expolygons_to_geo_multi(clip), CLIPPER_FACTOR);
    geo_multi_to_expolygons(&result)
}

/// Difference of two polygon sets (subject minus clip).
pub fn diff_ex(subject: &[ExPolygon], clip: &[ExPolygon]) -> ExPolygons {
    if subject.is_empty() {
        return Vec::new();
    }
    if clip.is_empty() {
        return subject.to_vec();
    }
    let result = expolygons_to_geo_multi(subject)
        .difference(&expolygons_to_geo_multi(clip), CLIPPER_FACTOR);
    geo_multi_to_expolygons(&result)
}

// ============================================================================
// Offset operations
// ============================================================================

/// Offset a set of regions by `delta` scaled units. Positive inflates,
/// negative deflates.
pub fn offset_expolygons(
    expolygons: &[ExPolygon],
    delta: Coord,
    join_type: OffsetJoinType,
) -> ExPolygons {
    if expolygons.is_empty() {
        return Vec::new();
    }
    let result = expolygons_to_geo_multi(expolygons).offset(
        delta as f64,
        join_type.into(),
        EndType::ClosedPolygon,
        CLIPPER_FACTOR,
    );
    geo_multi_to_expolygons(&result)
}

/// Offset with the default (miter) join.
#[inline]
pub fn offset_ex(expolygons: &[ExPolygon], delta: Coord) -> ExPolygons {
    offset_expolygons(expolygons, delta, OffsetJoinType::Miter)
}

/// Two sequential offsets (`delta1` then `delta2`). With opposite signs this
/// is a morphological opening or closing.
pub fn offset2_ex(expolygons: &[ExPolygon], delta1: Coord, delta2: Coord) -> ExPolygons {
    let first = offset_ex(expolygons, delta1);
    if first.is_empty() {
        return Vec::new();
    }
    offset_ex(&first, delta2)
}

// ============================================================================
// Line and polyline clipping
// ============================================================================

/// Interpolate along a segment, rounding to the integer grid.
fn point_at(a: Point, b: Point, t: f64) -> Point {
    Point::new(
        (a.x as f64 + t * (b.x - a.x) as f64).round() as Coord,
        (a.y as f64 + t * (b.y - a.y) as f64).round() as Coord,
    )
}

/// Collect the parameters in (0, 1) where segment `a`-`b` crosses any
/// boundary edge of the clip regions.
fn segment_crossings(a: Point, b: Point, clip: &[ExPolygon]) -> Vec<f64> {
    let ax = a.x as f64;
    let ay = a.y as f64;
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;

    let mut params = Vec::new();
    for expoly in clip {
        for edge in expoly.to_lines() {
            let cx = edge.a.x as f64;
            let cy = edge.a.y as f64;
            let ex = (edge.b.x - edge.a.x) as f64;
            let ey = (edge.b.y - edge.a.y) as f64;

            let denom = dx * ey - dy * ex;
            if denom.abs() < 1e-12 {
                continue; // parallel
            }
            let t = ((cx - ax) * ey - (cy - ay) * ex) / denom;
            let u = ((cx - ax) * dy - (cy - ay) * dx) / denom;
            if t > 0.0 && t < 1.0 && (0.0..=1.0).contains(&u) {
                params.push(t);
            }
        }
    }
    params
}

/// Split segment `a`-`b` at every boundary crossing and return the maximal
/// sub-segments that are inside (`keep_inside`) or outside the clip regions.
fn clip_segment(a: Point, b: Point, clip: &[ExPolygon], keep_inside: bool) -> Vec<(Point, Point)> {
    if a == b {
        let inside = expolygons_contain(clip, &a);
        return if inside == keep_inside {
            vec![(a, b)]
        } else {
            Vec::new()
        };
    }

    let mut params = segment_crossings(a, b, clip);
    params.push(0.0);
    params.push(1.0);
    params.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    params.dedup_by(|x, y| (*x - *y).abs() < 1e-9);

    let mut kept: Vec<(Point, Point)> = Vec::new();
    for w in params.windows(2) {
        let (t0, t1) = (w[0], w[1]);
        let mid = point_at(a, b, (t0 + t1) / 2.0);
        if expolygons_contain(clip, &mid) != keep_inside {
            continue;
        }
        let p0 = point_at(a, b, t0);
        let p1 = point_at(a, b, t1);
        if p0 == p1 {
            continue;
        }
        // Merge with the previous piece when the crossing was tangential.
        if let Some(last) = kept.last_mut() {
            if last.1 == p0 {
                last.1 = p1;
                continue;
            }
        }
        kept.push((p0, p1));
    }
    kept
}

/// Clip lines by a region set, returning the portions inside.
pub fn intersection_ln(lines: &[Line], clip: &[ExPolygon]) -> Lines {
    if lines.is_empty() || clip.is_empty() {
        return Vec::new();
    }
    lines
        .iter()
        .flat_map(|line| {
            clip_segment(line.a, line.b, clip, true)
                .into_iter()
                .map(|(a, b)| Line::new(a, b))
        })
        .collect()
}

/// Clip polylines by a region set, keeping the portions inside or outside
/// and chaining consecutive kept segments back into polylines.
fn clip_polylines(polylines: &[Polyline], clip: &[ExPolygon], keep_inside: bool) -> Polylines {
    let mut result = Vec::new();

    for polyline in polylines {
        let points = polyline.points();
        if points.len() < 2 {
            continue;
        }

        let mut chain: Vec<Point> = Vec::new();
        for seg in points.windows(2) {
            for (p0, p1) in clip_segment(seg[0], seg[1], clip, keep_inside) {
                let connected = chain
                    .last()
                    .is_some_and(|last| (last.x - p0.x).abs() <= 1 && (last.y - p0.y).abs() <= 1);
                if connected {
                    chain.push(p1);
                } else {
                    if chain.len() >= 2 {
                        result.push(Polyline::from_points(std::mem::take(&mut chain)));
                    }
                    chain = vec![p0, p1];
                }
            }
        }
        if chain.len() >= 2 {
            result.push(Polyline::from_points(chain));
        }
    }

    result
}

/// Clip polylines by a region set, returning the portions inside.
pub fn intersection_pl(polylines: &[Polyline], clip: &[ExPolygon]) -> Polylines {
    if polylines.is_empty() || clip.is_empty() {
        return Vec::new();
    }
    clip_polylines(polylines, clip, true)
}

/// Clip polylines by a region set, returning the portions outside.
pub fn diff_pl(polylines: &[Polyline], clip: &[ExPolygon]) -> Polylines {
    if polylines.is_empty() {
        return Vec::new();
    }
    if clip.is_empty() {
        return polylines.to_vec();
    }
    clip_polylines(polylines, clip, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::CoordF;

    fn square(x: Coord, y: Coord, size: Coord) -> ExPolygon {
        ExPolygon::new(Polygon::rectangle(
            Point::new(x, y),
            Point::new(x + size, y + size),
        ))
    }

    fn total_area(expolys: &[ExPolygon]) -> CoordF {
        expolys.iter().map(|ex| ex.area()).sum()
    }

    #[test]
    fn test_union_overlapping() {
        let result = union(&[square(0, 0, 1000)], &[square(500, 0, 1000)]);
        assert_eq!(result.len(), 1);
        assert!((total_area(&result) - 1_500_000.0).abs() < 1000.0);
    }

    #[test]
    fn test_union_ex_merges_set() {
        let result = union_ex(&[square(0, 0, 1000), square(500, 0, 1000), square(5000, 0, 1000)]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_intersection() {
        let result = intersection_ex(&[square(0, 0, 1000)], &[square(500, 0, 1000)]);
        assert_eq!(result.len(), 1);
        assert!((total_area(&result) - 500_000.0).abs() < 1000.0);

        let disjoint = intersection_ex(&[square(0, 0, 1000)], &[square(2000, 0, 1000)]);
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_diff_punches_hole() {
        let result = diff_ex(&[square(0, 0, 3000)], &[square(1000, 1000, 1000)]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes.len(), 1);
        assert!((total_area(&result) - 8_000_000.0).abs() < 1000.0);
    }

    #[test]
    fn test_offset_grow_shrink() {
        let grown = offset_ex(&[square(0, 0, 1000)], 500);
        assert!((total_area(&grown) - 4_000_000.0).abs() < 10_000.0);

        let shrunk = offset_ex(&[square(0, 0, 1000)], -200);
        assert!((total_area(&shrunk) - 360_000.0).abs() < 10_000.0);

        // Shrinking away the whole region yields nothing.
        let gone = offset_ex(&[square(0, 0, 1000)], -600);
        assert!(gone.is_empty());
    }

    #[test]
    fn test_offset2_opening_removes_thin_neck() {
        // Two squares joined by a 100-wide neck; opening by 200 removes it.
        let shape = union_ex(&[
            square(0, 0, 1000),
            square(2000, 0, 1000),
            ExPolygon::new(Polygon::rectangle(
                Point::new(1000, 450),
                Point::new(2000, 550),
            )),
        ]);
        let opened = offset2_ex(&shape, -200, 200);
        assert_eq!(opened.len(), 2);
    }

    #[test]
    fn test_intersection_ln_splits_on_hole() {
        let mut hole = Polygon::rectangle(Point::new(1000, 1000), Point::new(2000, 2000));
        hole.points_mut().reverse();
        let frame = ExPolygon::with_holes(
            Polygon::rectangle(Point::new(0, 0), Point::new(3000, 3000)),
            vec![hole],
        );

        let line = Line::new(Point::new(0, 1500), Point::new(3000, 1500));
        let clipped = intersection_ln(&[line], &[frame]);
        assert_eq!(clipped.len(), 2);
        let total: CoordF = clipped.iter().map(|l| l.length()).sum();
        assert!((total - 2000.0).abs() < 2.0);
    }

    #[test]
    fn test_intersection_ln_empty_inputs() {
        assert!(intersection_ln(&[], &[square(0, 0, 1000)]).is_empty());
        let line = Line::new(Point::new(0, 0), Point::new(100, 0));
        assert!(intersection_ln(&[line], &[]).is_empty());
    }

    #[test]
    fn test_intersection_pl_keeps_inside_portion() {
        let polyline = Polyline::from_points(vec![
            Point::new(-1000, 500),
            Point::new(500, 500),
            Point::new(500, 2000),
        ]);
        let clipped = intersection_pl(&[polyline], &[square(0, 0, 1000)]);
        assert_eq!(clipped.len(), 1);
        // Enters at x=0, turns at (500,500), exits at y=1000.
        assert!((clipped[0].length() - 1000.0).abs() < 2.0);
    }

    #[test]
    fn test_diff_pl_complements_intersection() {
        let polyline = Polyline::from_points(vec![Point::new(-1000, 500), Point::new(2000, 500)]);
        let clip = [square(0, 0, 1000)];

        let inside = intersection_pl(&[polyline.clone()], &clip);
        let outside = diff_pl(&[polyline.clone()], &clip);

        let len_in: CoordF = inside.iter().map(|pl| pl.length()).sum();
        let len_out: CoordF = outside.iter().map(|pl| pl.length()).sum();
        assert!((len_in - 1000.0).abs() < 2.0);
        assert!((len_in + len_out - polyline.length()).abs() < 4.0);
        assert_eq!(outside.len(), 2);
    }

    #[test]
    fn test_diff_pl_empty_clip_returns_input() {
        let polyline = Polyline::from_points(vec![Point::new(0, 0), Point::new(1000, 0)]);
        let result = diff_pl(&[polyline.clone()], &[]);
        assert_eq!(result, vec![polyline]);
    }

    #[test]
    fn test_union_safety_offset_connects_touching_squares() {
        // Two squares sharing an edge; the safety offset fuses them.
        let merged = union_safety_offset_ex(&[square(0, 0, 1000), square(1000, 0, 1000)]);
        assert_eq!(merged.len(), 1);
    }
}
