//! Bridge detection and coverage analysis.
//!
//! A bridge is a horizontal region printed across empty space, anchored at
//! its edges to material on the layer below. This module answers four
//! questions about such a region:
//!
//! 1. **Can it be bridged at all?** The region is inflated by the extrusion
//!    spacing and intersected with the lower slices; if no anchors result,
//!    the region is completely in the air.
//! 2. **In which direction?** Candidate angles come from uniform 2° sampling,
//!    the region's own boundary edges and the supporting edges. Each angle is
//!    swept with parallel test lines; a line counts as anchored when it rests
//!    in two anchors, or provably leaves its anchor over a concavity. A
//!    weighted score (anchored ratio, median span, longest span, perimeter
//!    bonus) picks the winner.
//! 3. **Which part is actually supported?** [`BridgeDetector::coverage`]
//!    rotates the region so the bridge direction is vertical, decomposes it
//!    into vertical strips ("trapezoids") and keeps the strips resting on at
//!    least two anchors.
//! 4. **Which boundary edges are loose?**
//!    [`BridgeDetector::unsupported_edges`] reports boundary pieces that lie
//!    on no support and are not parallel to the bridge direction.

use crate::clipper::{
    diff_ex, diff_pl, intersection_ex, intersection_ln, intersection_pl, offset_ex, union_polygons,
    union_safety_offset_ex,
};
use crate::geometry::{
    expolygons_contain, polylines_to_lines, to_lines, to_polylines, BoundingBox, ExPolygon,
    ExPolygons, Line, Lines, Point, PointF, Polygon, Polygons, Polyline, Polylines,
};
use crate::{Coord, CoordF, Error, Result, SCALING_FACTOR};
use log::{debug, trace};
use std::f64::consts::PI;

/// Hard cap on the number of direction candidates tested per region.
const MAX_CANDIDATES: usize = 200;

/// Check if two directions are parallel modulo PI, within a tolerance.
pub fn directions_parallel(a: CoordF, b: CoordF, tolerance: CoordF) -> bool {
    let diff = (a - b).abs() % PI;
    diff < tolerance || PI - diff < tolerance
}

/// Rotated extents: the axis-aligned bounding box the regions would have
/// after rotating every contour vertex by `angle`, without materializing the
/// rotated geometry.
fn get_extents_rotated(expolygons: &[ExPolygon], angle: CoordF) -> BoundingBox {
    let mut bbox = BoundingBox::new();
    for expoly in expolygons {
        for p in expoly.contour.points() {
            bbox.merge_point(p.rotated(angle));
        }
    }
    bbox
}

/// A candidate bridging direction and the sweep statistics accumulated for
/// it. Plain aggregate; the sweep is its single writer.
#[derive(Debug, Clone, Default)]
pub struct BridgeDirection {
    /// Candidate angle in radians.
    pub angle: CoordF,
    /// Squared length of the perimeter segment this candidate came from;
    /// 0 for uniform samples and supporting-edge directions.
    pub along_perimeter_length: CoordF,
    /// Summed length of anchored sweep lines.
    pub total_length_anchored: CoordF,
    /// Summed length of free (unanchored) sweep lines.
    pub total_length_free: CoordF,
    /// Longest anchored sweep line.
    pub max_length_anchored: CoordF,
    /// Longest free sweep line.
    pub max_length_free: CoordF,
    /// Median anchored sweep line length.
    pub median_length_anchor: CoordF,
    /// Number of anchored sweep lines.
    pub nb_lines_anchored: usize,
    /// Number of free sweep lines.
    pub nb_lines_free: usize,
    /// Final weighted score.
    pub coverage: CoordF,
}

impl BridgeDirection {
    fn new(angle: CoordF) -> Self {
        Self {
            angle,
            ..Self::default()
        }
    }

    fn from_perimeter(angle: CoordF, sqr_length: CoordF) -> Self {
        Self {
            angle,
            along_perimeter_length: sqr_length,
            ..Self::default()
        }
    }
}

/// Bridge detector: analyzes one bridging region against the slices of the
/// layer below.
///
/// Built once per region; [`detect_angle`](Self::detect_angle) stores the
/// chosen direction, after which [`coverage`](Self::coverage) and
/// [`unsupported_edges`](Self::unsupported_edges) may be queried freely.
#[derive(Debug)]
pub struct BridgeDetector {
    /// The bridging regions, not inflated.
    regions: ExPolygons,
    /// All surfaces of the object supporting this region.
    lower_slices: ExPolygons,
    /// Extrusion line spacing, scaled. Also the anchor inflation amount.
    spacing: Coord,
    /// Angular step of the uniform candidate sampling (2 degrees).
    resolution: CoordF,
    /// The chosen bridging angle, set by `detect_angle`.
    angle: Option<CoordF>,
    /// Portions of the inflated boundary lying on lower-slice contours.
    /// Only used to seed candidate directions.
    edges: Polylines,
    /// Intersection of the inflated regions with the lower slices. A sweep
    /// line whose endpoints land here is anchored.
    anchor_regions: ExPolygons,
}

impl BridgeDetector {
    /// Create a detector for a set of regions.
    ///
    /// `spacing` is the extrusion line spacing in scaled units.
    pub fn new(regions: ExPolygons, lower_slices: ExPolygons, spacing: Coord) -> Self {
        let mut detector = Self {
            regions,
            lower_slices,
            spacing,
            resolution: PI / 90.0,
            angle: None,
            edges: Vec::new(),
            anchor_regions: Vec::new(),
        };
        detector.initialize();
        detector
    }

    /// Create a detector for a single region.
    pub fn from_expolygon(region: ExPolygon, lower_slices: ExPolygons, spacing: Coord) -> Self {
        Self::new(vec![region], lower_slices, spacing)
    }

    /// The chosen bridging angle, if `detect_angle` succeeded.
    #[inline]
    pub fn angle(&self) -> Option<CoordF> {
        self.angle
    }

    /// The bridging regions under analysis.
    #[inline]
    pub fn regions(&self) -> &ExPolygons {
        &self.regions
    }

    /// The anchor regions found at construction.
    #[inline]
    pub fn anchor_regions(&self) -> &ExPolygons {
        &self.anchor_regions
    }

    /// The supporting edges found at construction.
    #[inline]
    pub fn edges(&self) -> &Polylines {
        &self.edges
    }

    /// Detect anchors and supporting edges.
    fn initialize(&mut self) {
        if self.lower_slices.is_empty() {
            return;
        }

        // Outset the bridge by the line spacing; this outer margin is where
        // anchors are detected.
        let grown = offset_ex(&self.regions, self.spacing);
        if grown.is_empty() {
            return;
        }

        // Supporting edges: the parts of the grown boundary lying on a lower
        // slice. Holes of the lower slices are irrelevant here, the contours
        // alone clip.
        let lower_contours: ExPolygons = self
            .lower_slices
            .iter()
            .map(|expoly| ExPolygon::new(expoly.contour.clone()))
            .collect();
        self.edges = intersection_pl(&to_polylines(&grown), &lower_contours);
        debug!("bridge region has {} supporting edge(s)", self.edges.len());

        // Anchors: intersection of the grown bridge with the lower slices.
        // The safety offset keeps Clipper from returning empty where edges
        // coincide exactly.
        self.anchor_regions = intersection_ex(&grown, &union_safety_offset_ex(&self.lower_slices));
    }

    /// Find the optimal bridging angle and store it.
    ///
    /// Pass `Some(angle)` to skip enumeration and score that direction only.
    /// Returns `false` when the region has no usable anchors at any angle;
    /// the stored angle is left unset in that case.
    pub fn detect_angle(&mut self, bridge_direction_override: Option<CoordF>) -> bool {
        if self.edges.is_empty() || self.anchor_regions.is_empty() {
            // Completely in the air; no anchors available at the layer below.
            return false;
        }

        let mut candidates = match bridge_direction_override {
            Some(angle) => vec![BridgeDirection::new(angle)],
            None => self.bridge_direction_candidates(false),
        };
        trace!("sweeping {} direction candidate(s)", candidates.len());

        // Outset the regions by half the anchor inflation; clipping the test
        // lines against this keeps their endpoints strictly inside anchors
        // instead of on anchor contours.
        let clip_area = offset_ex(&self.regions, self.spacing / 2);
        let anchor_bboxes: Vec<BoundingBox> = self
            .anchor_regions
            .iter()
            .map(|expoly| expoly.bounding_box())
            .collect();

        let mut have_coverage = false;
        for candidate in &mut candidates {
            self.sweep(candidate, &clip_area, &anchor_bboxes);
            have_coverage |= candidate.nb_lines_anchored > 0;
        }

        if !have_coverage {
            // No direction had a doubly-anchored line. Retry with boundary
            // directions only and count lines touching a single anchor.
            debug!("no anchored span at any angle, scoring single-anchor fallback");
            candidates = match bridge_direction_override {
                Some(angle) => vec![BridgeDirection::new(angle)],
                None => self.bridge_direction_candidates(true),
            };
            for candidate in &mut candidates {
                self.sweep_fallback(candidate, &clip_area);
                have_coverage |= candidate.nb_lines_anchored > 0;
            }
        }

        if !have_coverage {
            return false;
        }

        // Candidates without a single anchored line take no part in scoring.
        candidates.retain(|c| c.nb_lines_anchored > 0 && c.total_length_anchored > 0.0);
        score_candidates(&mut candidates);

        let mut i_best = 0;
        for i in 1..candidates.len() {
            if candidates[i].coverage > candidates[i_best].coverage {
                i_best = i;
            }
        }

        let mut angle = candidates[i_best].angle;
        if angle >= PI {
            angle -= PI;
        }
        debug!(
            "optimal bridging angle {:.1} deg (score {:.1})",
            angle.to_degrees(),
            candidates[i_best].coverage
        );
        self.angle = Some(angle);
        true
    }

    /// Enumerate candidate bridging directions.
    fn bridge_direction_candidates(&self, only_from_polygon: bool) -> Vec<BridgeDirection> {
        let mut angles: Vec<BridgeDirection> = Vec::new();

        if !only_from_polygon {
            let steps = (PI / self.resolution).floor() as i32;
            for i in 0..=steps {
                angles.push(BridgeDirection::new(i as CoordF * self.resolution));
            }
        }

        // Directions of the region boundary edges. With very detailed
        // contours only edges longer than the mean matter.
        let lines = to_lines(&self.regions);
        if lines.len() > MAX_CANDIDATES {
            let mean_sqr = lines[..MAX_CANDIDATES]
                .iter()
                .map(|line| line.length_squared() as CoordF)
                .sum::<CoordF>()
                / MAX_CANDIDATES as CoordF;
            for line in &lines {
                let sqr = line.length_squared() as CoordF;
                if sqr > mean_sqr {
                    angles.push(BridgeDirection::from_perimeter(line.direction_angle(), sqr));
                }
            }
        } else {
            for line in &lines {
                angles.push(BridgeDirection::from_perimeter(
                    line.direction_angle(),
                    line.length_squared() as CoordF,
                ));
            }
        }

        // Directions of open supporting edges; this finds the optimal angle
        // for C-shaped supports.
        for edge in &self.edges {
            if edge.len() >= 2 && edge.first_point() != edge.last_point() {
                let chord = Line::new(edge.first_point(), edge.last_point());
                angles.push(BridgeDirection::new(chord.direction_angle()));
            }
        }

        angles.sort_by(|a, b| {
            a.angle
                .partial_cmp(&b.angle)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // First drop uniform samples sitting on top of a perimeter-derived
        // direction.
        let mut i = 1;
        while i < angles.len() {
            let parallel =
                directions_parallel(angles[i].angle, angles[i - 1].angle, self.resolution);
            if parallel
                && angles[i - 1].along_perimeter_length > 0.0
                && angles[i].along_perimeter_length == 0.0
            {
                angles.remove(i);
                continue;
            }
            if parallel
                && angles[i].along_perimeter_length > 0.0
                && angles[i - 1].along_perimeter_length == 0.0
            {
                angles.remove(i - 1);
                continue;
            }
            i += 1;
        }

        // Then merge directions too close to each other, doubling the
        // tolerance until the list fits the cap.
        let mut min_resolution = self.resolution / 8.0;
        merge_parallel(&mut angles, min_resolution);
        while angles.len() > MAX_CANDIDATES {
            min_resolution *= 2.0;
            merge_parallel(&mut angles, min_resolution);
        }

        // 0 and PI are the same direction; drop the greater one.
        if angles.len() > 1
            && directions_parallel(
                angles[0].angle,
                angles[angles.len() - 1].angle,
                min_resolution,
            )
        {
            angles.pop();
        }

        angles
    }

    /// Generate sweep lines at `angle` covering the rotated `bbox`, spaced by
    /// `spacing` and centered half a spacing from the edge. Endpoints are
    /// rotated back into the unrotated frame.
    fn sweep_lines(&self, angle: CoordF, bbox: &BoundingBox) -> Lines {
        let mut lines = Vec::new();
        if !bbox.defined {
            return lines;
        }
        let (s, c) = angle.sin_cos();
        let x0 = bbox.min.x as CoordF;
        let x1 = bbox.max.x as CoordF;
        let mut y = bbox.min.y + self.spacing / 2;
        while y <= bbox.max.y {
            let yf = y as CoordF;
            lines.push(Line::new(
                Point::new(
                    (c * x0 - s * yf).round() as Coord,
                    (c * yf + s * x0).round() as Coord,
                ),
                Point::new(
                    (c * x1 - s * yf).round() as Coord,
                    (c * yf + s * x1).round() as Coord,
                ),
            ));
            y += self.spacing;
        }
        lines
    }

    /// Primary sweep: classify every clipped test line as anchored or free
    /// and accumulate the candidate's statistics.
    fn sweep(
        &self,
        candidate: &mut BridgeDirection,
        clip_area: &[ExPolygon],
        anchor_bboxes: &[BoundingBox],
    ) {
        let bbox = get_extents_rotated(&self.anchor_regions, -candidate.angle);
        let lines = self.sweep_lines(candidate.angle, &bbox);
        let clipped = intersection_ln(&lines, clip_area);

        let mut dist_anchored = Vec::new();
        for line in &clipped {
            let len = line.length();
            if self.line_is_anchored(line, len, anchor_bboxes) {
                candidate.total_length_anchored += len;
                candidate.max_length_anchored = candidate.max_length_anchored.max(len);
                candidate.nb_lines_anchored += 1;
                dist_anchored.push(len);
            } else {
                candidate.total_length_free += len;
                candidate.max_length_free = candidate.max_length_free.max(len);
                candidate.nb_lines_free += 1;
            }
        }
        if !dist_anchored.is_empty() {
            dist_anchored.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            candidate.median_length_anchor = dist_anchored[dist_anchored.len() / 2];
        }
    }

    /// Fallback sweep over the whole clipped region: a line counts as
    /// anchored as soon as one endpoint rests in any anchor.
    fn sweep_fallback(&self, candidate: &mut BridgeDirection, clip_area: &[ExPolygon]) {
        let bbox = get_extents_rotated(clip_area, -candidate.angle);
        let lines = self.sweep_lines(candidate.angle, &bbox);
        let clipped = intersection_ln(&lines, clip_area);

        let mut dist_anchored = Vec::new();
        for line in &clipped {
            let len = line.length();
            if expolygons_contain(&self.anchor_regions, &line.a)
                || expolygons_contain(&self.anchor_regions, &line.b)
            {
                candidate.total_length_anchored += len;
                candidate.max_length_anchored = candidate.max_length_anchored.max(len);
                candidate.nb_lines_anchored += 1;
                dist_anchored.push(len);
            } else {
                candidate.total_length_free += len;
                candidate.max_length_free = candidate.max_length_free.max(len);
                candidate.nb_lines_free += 1;
            }
        }
        if !dist_anchored.is_empty() {
            dist_anchored.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            candidate.median_length_anchor = dist_anchored[dist_anchored.len() / 2];
        }
    }

    /// Is this clipped sweep line resting on anchors at both ends, with a
    /// real void in between?
    ///
    /// This runs for every line of every candidate, so the anchor lookups go
    /// through a bounding-box pre-test and the expensive exact clip is saved
    /// for long lines that survived the cheap probes.
    fn line_is_anchored(&self, line: &Line, len: CoordF, anchor_bboxes: &[BoundingBox]) -> bool {
        let mut idx_a = None;
        let mut idx_b = None;
        for (i, anchor) in self.anchor_regions.iter().enumerate() {
            let bbox = &anchor_bboxes[i];
            if idx_a.is_none() && bbox.contains(&line.a) && anchor.contains_point(&line.a) {
                idx_a = Some(i);
            }
            if idx_b.is_none() && bbox.contains(&line.b) && anchor.contains_point(&line.b) {
                idx_b = Some(i);
            }
            if idx_a.is_some() && idx_b.is_some() {
                break;
            }
        }
        let (Some(ia), Some(ib)) = (idx_a, idx_b) else {
            return false;
        };
        if ia != ib {
            // Spans the void between two distinct anchors.
            return true;
        }

        // Both endpoints in the same anchor; the line may still leave it over
        // a concavity. Probe the midpoint first.
        let midpoint = line.midpoint();
        if !self.point_in_any_anchor(&midpoint, anchor_bboxes) {
            return true;
        }
        if len > (self.spacing * 10) as CoordF {
            let q1 = line.a.midpoint(&midpoint);
            let q2 = line.b.midpoint(&midpoint);
            if !self.point_in_any_anchor(&q1, anchor_bboxes)
                || !self.point_in_any_anchor(&q2, anchor_bboxes)
            {
                return true;
            }
        }
        if len > (self.spacing * 40) as CoordF {
            // Rare enough to afford the exact test: a line that leaves and
            // re-enters the anchors clips into more than one piece.
            return intersection_ln(std::slice::from_ref(line), &self.anchor_regions).len() > 1;
        }
        false
    }

    fn point_in_any_anchor(&self, p: &Point, anchor_bboxes: &[BoundingBox]) -> bool {
        self.anchor_regions
            .iter()
            .zip(anchor_bboxes)
            .any(|(anchor, bbox)| bbox.contains(p) && anchor.contains_point(p))
    }

    /// The part of the regions considered properly bridged at `angle`
    /// (default: the detected angle; empty if neither is available).
    ///
    /// The regions are rotated so the bridge direction is vertical and cut
    /// into vertical strips; a strip resting on at least two anchors is
    /// covered. `precise` cuts at uniform spacing and snaps each kept strip
    /// to the anchor extents instead of cutting at the region vertices.
    ///
    /// The result carries the half-spacing inflation margin; downstream
    /// clipping absorbs it.
    pub fn coverage(&self, angle: Option<CoordF>, precise: bool) -> Polygons {
        let Some(angle) = angle.or(self.angle) else {
            return Vec::new();
        };

        let rotation = PI / 2.0 - angle;
        let anchors_rot: ExPolygons = self
            .anchor_regions
            .iter()
            .map(|expoly| expoly.rotated(rotation))
            .collect();

        let mut covered: Polygons = Vec::new();
        for region in &self.regions {
            let rotated = region.rotated(rotation);
            // Same half-spacing outset as the sweep clip, so trapezoid
            // vertices land inside the anchors rather than on their contours.
            for expoly in offset_ex(std::slice::from_ref(&rotated), self.spacing / 2) {
                let trapezoids = if precise {
                    trapezoids_at_spacing(&expoly, self.spacing)
                } else {
                    trapezoids_at_vertices(&expoly)
                };
                for mut trapezoid in trapezoids {
                    let n_supported = if precise {
                        let supports = intersection_ex(
                            std::slice::from_ref(&ExPolygon::new(trapezoid.clone())),
                            &anchors_rot,
                        );
                        if supports.len() >= 2 {
                            snap_trapezoid(&mut trapezoid, &supports, self.spacing);
                        }
                        supports.len()
                    } else {
                        intersection_ln(&trapezoid.edges(), &anchors_rot)
                            .iter()
                            .filter(|segment| segment.length() >= self.spacing as CoordF)
                            .count()
                    };
                    if n_supported >= 2 {
                        covered.push(trapezoid);
                    }
                }
            }
        }

        // Unite before rotating back; the rotation turns exact strip borders
        // into tiny gaps and overlaps.
        let mut covered = union_polygons(&covered);
        for polygon in &mut covered {
            polygon.rotate(-rotation);
        }
        covered
    }

    /// Boundary edges that rest on no support at `angle` (default: the
    /// detected angle; empty if neither is available).
    ///
    /// Edges parallel to the bridge direction are omitted: supporting them
    /// would not anchor a single extrusion line.
    pub fn unsupported_edges(&self, angle: Option<CoordF>) -> Polylines {
        let Some(angle) = angle.or(self.angle) else {
            return Vec::new();
        };

        let grown_lower = offset_ex(&self.lower_slices, self.spacing);
        let tolerance = self.resolution / 8.0;

        let mut unsupported = Vec::new();
        for region in &self.regions {
            let loose = diff_pl(&region.to_polylines(), &grown_lower);
            for line in polylines_to_lines(&loose) {
                if !directions_parallel(line.direction_angle(), angle, tolerance) {
                    unsupported.push(Polyline::from_points(vec![line.a, line.b]));
                }
            }
        }
        unsupported
    }
}

/// Compute each candidate's weighted score. Anchored ratio dominates; the
/// median and longest anchored spans are ranked against the other candidates
/// and inverted (shorter spans score higher); perimeter-derived directions
/// get a small bonus.
fn score_candidates(candidates: &mut [BridgeDirection]) {
    let mut min_median = CoordF::INFINITY;
    let mut max_median = CoordF::NEG_INFINITY;
    let mut min_max = CoordF::INFINITY;
    let mut max_max = CoordF::NEG_INFINITY;
    for c in candidates.iter() {
        min_median = min_median.min(c.median_length_anchor);
        max_median = max_median.max(c.median_length_anchor);
        min_max = min_max.min(c.max_length_anchored);
        max_max = max_max.max(c.max_length_anchored);
    }

    for c in candidates.iter_mut() {
        let ratio_anchored =
            c.total_length_anchored / (c.total_length_anchored + c.total_length_free);
        let ratio_median =
            1.0 - (c.median_length_anchor - min_median) / (max_median - min_median).max(1.0);
        let ratio_max = 1.0 - (c.max_length_anchored - min_max) / (max_max - min_max).max(1.0);
        c.coverage = 70.0 * ratio_anchored + 15.0 * ratio_median + 15.0 * ratio_max;
        if c.along_perimeter_length > 0.0 {
            c.coverage += 5.0;
        }
    }
}

/// Merge adjacent candidates whose directions are parallel within
/// `tolerance`, keeping the one backed by the longer perimeter segment.
fn merge_parallel(angles: &mut Vec<BridgeDirection>, tolerance: CoordF) {
    let mut i = 1;
    while i < angles.len() {
        if directions_parallel(angles[i].angle, angles[i - 1].angle, tolerance) {
            if angles[i].along_perimeter_length < angles[i - 1].along_perimeter_length {
                angles.remove(i);
            } else {
                angles.remove(i - 1);
            }
        } else {
            i += 1;
        }
    }
}

/// Cut a (rotated) region into vertical strips at the distinct x coordinates
/// of its vertices. May produce more strips than strictly necessary when
/// unrelated vertices share an x range.
fn trapezoids_at_vertices(expoly: &ExPolygon) -> Polygons {
    let points = expoly.all_points();
    if points.is_empty() {
        return Vec::new();
    }
    let bbox = BoundingBox::from_points(&points);

    let mut xx: Vec<Coord> = points.iter().map(|p| p.x).collect();
    xx.sort_unstable();
    xx.dedup();

    let mut trapezoids = Vec::new();
    for w in xx.windows(2) {
        let rect = Polygon::rectangle(Point::new(w[0], bbox.min.y), Point::new(w[1], bbox.max.y));
        for piece in intersection_ex(
            std::slice::from_ref(&ExPolygon::new(rect)),
            std::slice::from_ref(expoly),
        ) {
            trapezoids.push(piece.contour);
        }
    }
    trapezoids
}

/// Cut a (rotated) region into vertical strips of one spacing, each inset by
/// a quarter spacing so neighboring strips share no vertical edge.
fn trapezoids_at_spacing(expoly: &ExPolygon, spacing: Coord) -> Polygons {
    let points = expoly.all_points();
    if points.is_empty() {
        return Vec::new();
    }
    let bbox = BoundingBox::from_points(&points);

    let mut xx: Vec<Coord> = Vec::new();
    let mut x = bbox.min.x;
    while x < bbox.max.x - spacing / 2 {
        xx.push(x);
        x += spacing;
    }
    xx.push(bbox.max.x);

    let inset = spacing / 4;
    let mut trapezoids = Vec::new();
    for w in xx.windows(2) {
        if w[0] == w[1] {
            continue;
        }
        let rect = Polygon::rectangle(
            Point::new(w[0] + inset, bbox.min.y),
            Point::new(w[1] - inset, bbox.max.y),
        );
        for piece in intersection_ex(
            std::slice::from_ref(&ExPolygon::new(rect)),
            std::slice::from_ref(expoly),
        ) {
            trapezoids.push(piece.contour);
        }
    }
    trapezoids
}

/// Snap a supported trapezoid to its supports: clamp it vertically to the
/// span of the support centers and widen it horizontally to undo the strip
/// inset, so adjacent trapezoids rejoin on union.
fn snap_trapezoid(trapezoid: &mut Polygon, supports: &[ExPolygon], spacing: Coord) {
    let first_center = supports[0].bounding_box().center().y;
    let mut min_y = first_center;
    let mut max_y = first_center;
    for support in supports {
        let center_y = support.bounding_box().center().y;
        min_y = min_y.min(center_y);
        max_y = max_y.max(center_y);
    }

    let Some((mut min_x, mut max_x)) = trapezoid.x_extents() else {
        return;
    };
    min_x -= spacing / 4 + 1;
    max_x += spacing / 4 + 1;
    let mid_x = (min_x + max_x) / 2;

    for p in trapezoid.points_mut() {
        if p.y < min_y {
            p.y = min_y;
        }
        if p.y > max_y {
            p.y = max_y;
        }
        if p.x > min_x && p.x < mid_x {
            p.x = min_x;
        }
        if p.x < max_x && p.x > mid_x {
            p.x = max_x;
        }
    }
}

// ============================================================================
// Layer-level bridge discovery
// ============================================================================

/// Configuration for layer-level bridge discovery.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Minimum area for a region to be analyzed as a bridge (mm²).
    pub min_area: CoordF,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { min_area: 1.0 }
    }
}

/// A detected bridge region with its optimal bridging direction.
#[derive(Debug, Clone)]
pub struct Bridge {
    /// The unsupported area that needs bridging.
    pub area: ExPolygon,
    /// The optimal bridging angle, if one was found.
    pub angle: Option<CoordF>,
    /// Anchor regions (where the bridge connects to support).
    pub anchor_regions: ExPolygons,
    /// Supporting edges (where the inflated contour rests on support).
    pub edges: Polylines,
}

impl Bridge {
    /// The bridging direction as a unit vector.
    pub fn direction(&self) -> Option<PointF> {
        self.angle.map(|a| PointF::new(a.cos(), a.sin()))
    }

    /// The direction perpendicular to the bridge (for infill spacing).
    pub fn perpendicular_direction(&self) -> Option<PointF> {
        self.direction().map(|d| d.perp())
    }

    /// Region area in mm².
    pub fn area_mm2(&self) -> CoordF {
        self.area.area() / (SCALING_FACTOR * SCALING_FACTOR)
    }
}

/// Find the bridges of a layer: the parts of `layer` not supported by
/// `lower`, large enough to matter, each analyzed with its own
/// [`BridgeDetector`].
///
/// `spacing` is the extrusion line spacing in scaled units.
pub fn detect_bridges(
    layer: &ExPolygons,
    lower: &ExPolygons,
    spacing: Coord,
    config: &BridgeConfig,
) -> Result<Vec<Bridge>> {
    if spacing <= 0 {
        return Err(Error::InvalidSpacing(spacing));
    }
    if layer.is_empty() {
        return Ok(Vec::new());
    }

    let unsupported = if lower.is_empty() {
        layer.clone()
    } else {
        diff_ex(layer, lower)
    };

    let min_area_scaled = config.min_area * SCALING_FACTOR * SCALING_FACTOR;
    let mut bridges = Vec::new();
    for expoly in unsupported {
        if expoly.area() < min_area_scaled {
            continue;
        }
        let mut detector = BridgeDetector::from_expolygon(expoly.clone(), lower.clone(), spacing);
        detector.detect_angle(None);
        bridges.push(Bridge {
            area: expoly,
            angle: detector.angle(),
            anchor_regions: detector.anchor_regions().clone(),
            edges: detector.edges().clone(),
        });
    }
    Ok(bridges)
}
