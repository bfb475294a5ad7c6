//! Polyline representation and the projection engine.
//!
//! # Data layout
//!
//! A `Polyline` stores its vertices together with the cumulative haversine
//! distance from the first vertex to each vertex:
//!
//! ```text
//! points:     p0 ──── p1 ──────── p2 ── p3
//! cumulative: 0.0     d01         d02   d03 = total_length()
//! ```
//!
//! Both vectors are built once in [`Polyline::new`]; a polyline is never
//! mutated afterwards, slicing always produces a new value.  Distance lookups
//! are therefore O(1) and "which segment contains distance d" is a binary
//! search over `cumulative`.
//!
//! # Projection
//!
//! [`Polyline::closest_point`] drops a perpendicular from the target onto
//! each segment by casting a [`PERPENDICULAR_CAST_M`]-long ray at the
//! segment bearing ±90° and intersecting it with the segment in plain
//! lat/lon space.  Segment endpoints are candidates too, and are evaluated
//! before the perpendicular foot, so the projection is never worse than
//! snapping to a vertex.

use nav_core::{GeoPoint, segment_intersection};

/// Length of the perpendicular ray cast from the target towards a segment.
/// Far longer than any real route segment.
pub const PERPENDICULAR_CAST_M: f64 = 1_000_000.0;

// ── ProjectionResult ──────────────────────────────────────────────────────────

/// Where a coordinate lands on a polyline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionResult {
    /// The closest point on the polyline.
    pub coordinate: GeoPoint,

    /// Index of the vertex that starts the matched segment, or the index
    /// after it when the match lies strictly closer to the segment's far
    /// end.  Endpoint matches report the endpoint's own index.
    pub segment_index: usize,

    /// Distance along the polyline from its first vertex to `coordinate`.
    pub distance_from_start: f64,

    /// Distance from the queried target to `coordinate`.
    pub distance_to_target: f64,
}

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An ordered sequence of coordinates; order is the direction of travel.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polyline {
    points:     Vec<GeoPoint>,
    /// `cumulative[i]` = along-line distance from `points[0]` to `points[i]`.
    cumulative: Vec<f64>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance_m(*p);
            }
            cumulative.push(total);
        }
        Self { points, cumulative }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    /// Sum of consecutive haversine distances; 0 for fewer than two points.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Along-line distance from the first vertex to vertex `index`.
    #[inline]
    pub fn distance_to_vertex(&self, index: usize) -> Option<f64> {
        self.cumulative.get(index).copied()
    }

    /// Length of the segment `index → index + 1`.
    pub fn segment_length(&self, index: usize) -> Option<f64> {
        let end = self.cumulative.get(index + 1)?;
        Some(end - self.cumulative[index])
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// Closest point on the polyline to `target`, scanning segments from
    /// `search_from` onwards.
    ///
    /// `search_from` is only a hint that skips segments already passed; pass
    /// 0 for a full scan.  Values past the last segment are clamped to it.
    /// Returns `None` only for an empty polyline.
    pub fn closest_point(&self, target: GeoPoint, search_from: usize) -> Option<ProjectionResult> {
        let first = self.first()?;
        if self.points.len() == 1 {
            return Some(ProjectionResult {
                coordinate:          first,
                segment_index:       0,
                distance_from_start: 0.0,
                distance_to_target:  target.distance_m(first),
            });
        }

        let last_segment = self.points.len() - 2;
        let mut best: Option<ProjectionResult> = None;
        let mut consider = |candidate: ProjectionResult| {
            // Strict `<`: on a tie the earlier-evaluated candidate wins.
            if best.is_none_or(|b| candidate.distance_to_target < b.distance_to_target) {
                best = Some(candidate);
            }
        };

        for i in search_from.min(last_segment)..=last_segment {
            let (a, b) = (self.points[i], self.points[i + 1]);

            consider(ProjectionResult {
                coordinate:          a,
                segment_index:       i,
                distance_from_start: self.cumulative[i],
                distance_to_target:  target.distance_m(a),
            });
            consider(ProjectionResult {
                coordinate:          b,
                segment_index:       i + 1,
                distance_from_start: self.cumulative[i + 1],
                distance_to_target:  target.distance_m(b),
            });

            if let Some(foot) = perpendicular_foot(target, a, b) {
                let from_a = a.distance_m(foot);
                let index = if b.distance_m(foot) < from_a { i + 1 } else { i };
                consider(ProjectionResult {
                    coordinate:          foot,
                    segment_index:       index,
                    distance_from_start: self.cumulative[i] + from_a,
                    distance_to_target:  target.distance_m(foot),
                });
            }
        }

        best
    }

    // ── Walking ───────────────────────────────────────────────────────────

    /// The coordinate `distance_m` along the polyline from its first vertex.
    ///
    /// Negative distances yield the first vertex.  Returns `None` for an
    /// empty polyline or when `distance_m` exceeds [`total_length`].
    ///
    /// [`total_length`]: Polyline::total_length
    pub fn advance(&self, distance_m: f64) -> Option<GeoPoint> {
        let first = self.first()?;
        if distance_m.is_nan() || distance_m > self.total_length() {
            return None;
        }
        if distance_m <= 0.0 {
            return Some(first);
        }

        // First vertex whose cumulative distance reaches `distance_m`.  It is
        // at least 1 (cumulative[0] == 0 < distance_m) and at most the last
        // index (cumulative[last] == total >= distance_m).
        let end = self.cumulative.partition_point(|&d| d < distance_m);
        let start = end - 1;
        Some(self.interpolate(start, distance_m - self.cumulative[start]))
    }

    /// Sub-polyline between the projections of `from` and `to`.
    ///
    /// `None` stands for the polyline's own first / last vertex.  The result
    /// is always in original order, even if `to` projects before `from`.
    pub fn slice(&self, from: Option<GeoPoint>, to: Option<GeoPoint>) -> Polyline {
        let start = from
            .and_then(|p| self.closest_point(p, 0))
            .map_or(0.0, |r| r.distance_from_start);
        let end = to
            .and_then(|p| self.closest_point(p, 0))
            .map_or(self.total_length(), |r| r.distance_from_start);
        self.slice_by_distance(start, end)
    }

    /// Sub-polyline between two along-line distances (clamped to the line,
    /// swapped if reversed).  Interior vertices are kept verbatim; the two
    /// ends are interpolated.
    pub fn slice_by_distance(&self, start_m: f64, end_m: f64) -> Polyline {
        let Some(last) = self.last() else {
            return Polyline::empty();
        };
        let total = self.total_length();
        let clamp = |d: f64| if d.is_nan() { 0.0 } else { d.clamp(0.0, total) };
        let (lo, hi) = {
            let (a, b) = (clamp(start_m), clamp(end_m));
            if a <= b { (a, b) } else { (b, a) }
        };

        let at = |d: f64| self.advance(d).unwrap_or(last);

        let mut points = Vec::with_capacity(self.points.len());
        points.push(at(lo));
        points.extend(
            self.points
                .iter()
                .zip(&self.cumulative)
                .filter(|&(_, &d)| d > lo && d < hi)
                .map(|(&p, _)| p),
        );
        let end = at(hi);
        if points.last() != Some(&end) {
            points.push(end);
        }
        Polyline::new(points)
    }

    /// The `length_m` of polyline that follows `from_m`.
    #[inline]
    pub fn trimmed(&self, from_m: f64, length_m: f64) -> Polyline {
        self.slice_by_distance(from_m, from_m + length_m)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn interpolate(&self, segment: usize, offset: f64) -> GeoPoint {
        let (a, b) = (self.points[segment], self.points[segment + 1]);
        let length = self.cumulative[segment + 1] - self.cumulative[segment];
        if offset <= 0.0 {
            a
        } else if offset >= length {
            b
        } else {
            a.destination(offset, a.bearing_to(b))
        }
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    fn from(points: Vec<GeoPoint>) -> Self {
        Polyline::new(points)
    }
}

/// Foot of the perpendicular from `target` onto segment `a → b`, trying the
/// +90° side first and the −90° side second.
fn perpendicular_foot(target: GeoPoint, a: GeoPoint, b: GeoPoint) -> Option<GeoPoint> {
    let heading = a.bearing_to(b);
    [90.0, -90.0].into_iter().find_map(|offset| {
        let far = target.destination(PERPENDICULAR_CAST_M, heading + offset);
        segment_intersection((target, far), (a, b))
    })
}
