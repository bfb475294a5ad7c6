//! Unit tests for nav-spatial.
//!
//! All tests use hand-crafted shapes near the equator so distances are easy
//! to reason about: 0.001° ≈ 111.23 m.

#[cfg(test)]
mod helpers {
    use nav_core::GeoPoint;

    use crate::Polyline;

    /// Straight line due north: (0,0) → (0.001,0) → (0.002,0).
    pub fn northbound() -> Polyline {
        Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.002, 0.0),
        ])
    }

    /// North for one block, then a right-angle turn east.
    pub fn right_turn() -> Polyline {
        Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.001, 0.001),
        ])
    }

    /// A zig-zag with uneven segment lengths.
    pub fn zigzag() -> Polyline {
        Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0005, 0.0003),
            GeoPoint::new(0.0007, 0.0011),
            GeoPoint::new(0.0016, 0.0012),
            GeoPoint::new(0.0018, 0.0025),
        ])
    }

    pub const BLOCK_M: f64 = 111.229;
}

// ── Polyline basics ───────────────────────────────────────────────────────────

#[cfg(test)]
mod polyline {
    use nav_core::GeoPoint;

    use super::helpers::{BLOCK_M, northbound};
    use crate::Polyline;

    #[test]
    fn total_length_sums_segments() {
        let line = northbound();
        assert!((line.total_length() - 2.0 * BLOCK_M).abs() < 0.1, "got {}", line.total_length());
        assert_eq!(line.distance_to_vertex(0), Some(0.0));
        assert!((line.segment_length(1).unwrap() - BLOCK_M).abs() < 0.1);
        assert_eq!(line.segment_length(2), None);
    }

    #[test]
    fn empty_and_single_point_lengths() {
        assert_eq!(Polyline::empty().total_length(), 0.0);
        assert_eq!(Polyline::new(vec![GeoPoint::new(1.0, 1.0)]).total_length(), 0.0);
    }

    #[test]
    fn advance_interpolates_inside_segment() {
        let line = northbound();
        let p = line.advance(6.0).unwrap();
        assert!((GeoPoint::new(0.0, 0.0).distance_m(p) - 6.0).abs() < 1e-6);
        assert!(p.lon.abs() < 1e-12);
    }

    #[test]
    fn advance_crosses_vertices() {
        let line = northbound();
        let p = line.advance(BLOCK_M + 10.0).unwrap();
        assert!((GeoPoint::new(0.001, 0.0).distance_m(p) - 10.0).abs() < 0.05);
    }

    #[test]
    fn advance_bounds() {
        let line = northbound();
        assert_eq!(line.advance(-5.0), Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(line.advance(line.total_length()), Some(GeoPoint::new(0.002, 0.0)));
        assert_eq!(line.advance(line.total_length() + 0.5), None);
        assert_eq!(Polyline::empty().advance(0.0), None);
        assert_eq!(line.advance(f64::NAN), None);
    }

    #[test]
    fn advance_on_single_point() {
        let line = Polyline::new(vec![GeoPoint::new(3.0, 4.0)]);
        assert_eq!(line.advance(0.0), Some(GeoPoint::new(3.0, 4.0)));
        assert_eq!(line.advance(1.0), None);
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod projection {
    use nav_core::GeoPoint;

    use super::helpers::{BLOCK_M, northbound, zigzag};
    use crate::Polyline;

    #[test]
    fn empty_polyline_has_no_projection() {
        assert_eq!(Polyline::empty().closest_point(GeoPoint::new(0.0, 0.0), 0), None);
    }

    #[test]
    fn single_point_projects_to_itself() {
        let only = GeoPoint::new(10.0, 10.0);
        let line = Polyline::new(vec![only]);
        let r = line.closest_point(GeoPoint::new(10.001, 10.0), 0).unwrap();
        assert_eq!(r.coordinate, only);
        assert_eq!(r.segment_index, 0);
        assert_eq!(r.distance_from_start, 0.0);
    }

    #[test]
    fn perpendicular_foot_on_segment() {
        let line = northbound();
        // 20 m east of the line, 30 m up the first segment.
        let target = GeoPoint::new(0.0, 0.0).destination(30.0, 0.0).destination(20.0, 90.0);
        let r = line.closest_point(target, 0).unwrap();
        assert!(r.coordinate.lon.abs() < 1e-9, "foot should lie on the line: {}", r.coordinate);
        assert!((r.distance_from_start - 30.0).abs() < 0.05, "got {}", r.distance_from_start);
        assert!((r.distance_to_target - 20.0).abs() < 0.05);
        assert_eq!(r.segment_index, 0);
    }

    #[test]
    fn index_rounds_forward_past_segment_midpoint() {
        let line = northbound();
        let target = GeoPoint::new(0.0, 0.0).destination(90.0, 0.0).destination(15.0, 270.0);
        let r = line.closest_point(target, 0).unwrap();
        assert!((r.distance_from_start - 90.0).abs() < 0.05);
        assert_eq!(r.segment_index, 1);
    }

    #[test]
    fn target_beyond_end_snaps_to_last_vertex() {
        let line = northbound();
        let r = line.closest_point(GeoPoint::new(0.003, 0.0), 0).unwrap();
        assert_eq!(r.coordinate, GeoPoint::new(0.002, 0.0));
        assert_eq!(r.segment_index, 2);
        assert!((r.distance_from_start - 2.0 * BLOCK_M).abs() < 0.1);
    }

    #[test]
    fn search_from_skips_passed_segments() {
        // Out-and-back: the return leg overlaps the outbound leg.
        let line = Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.0, 0.00001),
        ]);
        let target = GeoPoint::new(0.0002, 0.000001);
        let full = line.closest_point(target, 0).unwrap();
        let hinted = line.closest_point(target, 1).unwrap();
        assert!(full.distance_from_start < BLOCK_M);
        assert!(hinted.distance_from_start > BLOCK_M);
    }

    #[test]
    fn never_worse_than_nearest_vertex() {
        let line = zigzag();
        let targets = [
            GeoPoint::new(0.0003, 0.0009),
            GeoPoint::new(-0.0004, 0.0002),
            GeoPoint::new(0.0011, 0.0016),
            GeoPoint::new(0.0020, 0.0030),
            GeoPoint::new(0.0009, 0.0000),
            GeoPoint::new(0.0017, 0.0019),
        ];
        for target in targets {
            let r = line.closest_point(target, 0).unwrap();
            let nearest_vertex = line
                .points()
                .iter()
                .map(|v| target.distance_m(*v))
                .fold(f64::INFINITY, f64::min);
            assert!(
                r.distance_to_target <= nearest_vertex + 1e-9,
                "{target}: projection {} vs vertex {nearest_vertex}",
                r.distance_to_target
            );
            assert!((target.distance_m(r.coordinate) - r.distance_to_target).abs() < 1e-9);
        }
    }
}

// ── Slicing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod slicing {
    use nav_core::GeoPoint;

    use super::helpers::{BLOCK_M, northbound, zigzag};
    use crate::Polyline;

    #[test]
    fn slice_by_distance_keeps_interior_vertices() {
        let line = northbound();
        let s = line.slice_by_distance(50.0, BLOCK_M + 50.0);
        assert_eq!(s.len(), 3);
        assert_eq!(s.points()[1], GeoPoint::new(0.001, 0.0));
        assert!((s.total_length() - BLOCK_M).abs() < 0.05);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let line = zigzag();
        let forward = line.slice_by_distance(40.0, 200.0);
        let backward = line.slice_by_distance(200.0, 40.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn bounds_are_clamped_to_the_line() {
        let line = northbound();
        let s = line.slice_by_distance(-100.0, 10_000.0);
        assert_eq!(s.points(), line.points());
    }

    #[test]
    fn suffix_slice_shrinks_length() {
        let line = zigzag();
        let total = line.total_length();
        let suffix = line.slice_by_distance(75.0, total);
        assert!((suffix.total_length() - (total - 75.0)).abs() < 0.05);
        assert_eq!(suffix.last(), line.last());
    }

    #[test]
    fn slice_between_coordinates() {
        let line = northbound();
        let from = GeoPoint::new(0.0, 0.0).destination(20.0, 0.0).destination(5.0, 90.0);
        let s = line.slice(Some(from), None);
        assert!((s.total_length() - (2.0 * BLOCK_M - 20.0)).abs() < 0.05);
        assert_eq!(s.last(), Some(GeoPoint::new(0.002, 0.0)));

        let whole = line.slice(None, None);
        assert_eq!(whole.points(), line.points());
    }

    #[test]
    fn slice_in_reverse_order_keeps_original_direction() {
        let line = northbound();
        let early = GeoPoint::new(0.0002, 0.0);
        let late = GeoPoint::new(0.0015, 0.0);
        let s = line.slice(Some(late), Some(early));
        assert!(s.first().unwrap().lat < s.last().unwrap().lat);
    }

    #[test]
    fn slicing_empty_and_single() {
        assert!(Polyline::empty().slice_by_distance(0.0, 10.0).is_empty());
        let only = Polyline::new(vec![GeoPoint::new(1.0, 2.0)]);
        assert_eq!(only.slice_by_distance(0.0, 10.0).points(), only.points());
    }

    #[test]
    fn trimmed_window_counts_vertices() {
        let line = zigzag();
        let window = line.trimmed(0.0, line.total_length());
        assert_eq!(window.len(), line.len());
        let short = line.trimmed(1.0, 2.0);
        assert_eq!(short.len(), 2);
    }
}

// ── Turn-penalty annotation ───────────────────────────────────────────────────

#[cfg(test)]
mod annotation {
    use nav_core::GeoPoint;

    use super::helpers::{northbound, right_turn};
    use crate::{Polyline, TurnPenaltyBand, annotate};

    #[test]
    fn aligned_one_to_one() {
        let line = right_turn();
        let a = annotate(&line, TurnPenaltyBand::default(), 6.0);
        assert_eq!(a.len(), line.len());
        for (v, p) in a.iter().zip(line.points()) {
            assert_eq!(v.point, *p);
            assert_eq!(v.speed_hint, 6.0);
        }
    }

    #[test]
    fn right_angle_turn_hits_the_ceiling() {
        let a = annotate(&right_turn(), TurnPenaltyBand::default(), 6.0);
        assert_eq!(a[0].turn_penalty, 0.0);
        assert!((a[1].turn_penalty - 90.0).abs() < 0.01, "got {}", a[1].turn_penalty);
        assert!((a[1].heading - 90.0).abs() < 0.01);
    }

    #[test]
    fn last_vertex_repeats_predecessor() {
        let a = annotate(&right_turn(), TurnPenaltyBand::default(), 6.0);
        assert_eq!(a[2].heading, a[1].heading);
        assert_eq!(a[2].turn_penalty, a[1].turn_penalty);
        assert_eq!(a[2].point, GeoPoint::new(0.001, 0.001));
    }

    #[test]
    fn straight_line_has_no_penalty() {
        let a = annotate(&northbound(), TurnPenaltyBand::default(), 6.0);
        assert!(a.iter().all(|v| v.turn_penalty < 1e-6));
    }

    #[test]
    fn u_turn_is_clamped() {
        let line = Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        let a = annotate(&line, TurnPenaltyBand::default(), 6.0);
        assert_eq!(a[1].turn_penalty, 90.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(annotate(&Polyline::empty(), TurnPenaltyBand::default(), 6.0).is_empty());
        let one = annotate(&Polyline::new(vec![GeoPoint::new(5.0, 5.0)]), TurnPenaltyBand::default(), 6.0);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].turn_penalty, 0.0);
    }
}

// ── Route geometry & vertex index ─────────────────────────────────────────────

#[cfg(test)]
mod route {
    use nav_core::GeoPoint;

    use super::helpers::{BLOCK_M, northbound, zigzag};
    use crate::{Polyline, RouteGeometry, SpatialError, VertexIndex};

    #[test]
    fn expected_speed_from_travel_times() {
        let route = RouteGeometry::new(northbound())
            .with_segment_travel_times(vec![10.0, 20.0])
            .unwrap();
        assert!((route.expected_segment_speed(0).unwrap() - BLOCK_M / 10.0).abs() < 0.01);
        assert!((route.expected_segment_speed(1).unwrap() - BLOCK_M / 20.0).abs() < 0.01);
        assert_eq!(route.expected_segment_speed(2), None);
        assert_eq!(RouteGeometry::new(northbound()).expected_segment_speed(0), None);
    }

    #[test]
    fn travel_time_table_validated() {
        let wrong_len = RouteGeometry::new(northbound()).with_segment_travel_times(vec![1.0]);
        assert!(matches!(wrong_len, Err(SpatialError::TravelTimeCount { expected: 2, got: 1 })));

        let zero = RouteGeometry::new(northbound()).with_segment_travel_times(vec![1.0, 0.0]);
        assert!(matches!(zero, Err(SpatialError::TravelTime { index: 1, .. })));
    }

    #[test]
    fn drivable_needs_two_points() {
        assert!(RouteGeometry::new(northbound()).is_drivable());
        assert!(!RouteGeometry::new(Polyline::new(vec![GeoPoint::new(0.0, 0.0)])).is_drivable());
        assert!(!RouteGeometry::default().is_drivable());
    }

    #[test]
    fn nearest_vertex_lookup() {
        let line = zigzag();
        let index = VertexIndex::build(&line);
        assert_eq!(index.len(), line.len());
        assert_eq!(index.nearest(GeoPoint::new(0.00155, 0.00118)), Some(3));
        assert_eq!(index.nearest(GeoPoint::new(-1.0, -1.0)), Some(0));
        assert_eq!(VertexIndex::build(&Polyline::empty()).nearest(GeoPoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn nearest_vertex_ties_prefer_lower_index() {
        let line = Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        let index = VertexIndex::build(&line);
        assert_eq!(index.nearest(GeoPoint::new(0.0001, 0.0)), Some(0));
    }

    #[test]
    fn nearest_vertex_ranks_by_ground_distance_at_high_latitude() {
        // 40 m east spans more longitude degrees than 60 m north spans
        // latitude degrees once cos(60°) halves a degree of longitude.
        let origin = GeoPoint::new(60.0, 10.0);
        let north = origin.destination(60.0, 0.0);
        let east = origin.destination(40.0, 90.0);
        assert!((east.lon - origin.lon) > (north.lat - origin.lat));

        let index = VertexIndex::build(&Polyline::new(vec![north, east]));
        assert_eq!(index.nearest(origin), Some(1));
        assert_eq!(index.nearest(origin.destination(5.0, 0.0)), Some(1));
        assert_eq!(index.nearest(origin.destination(25.0, 0.0)), Some(0));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{SpatialError, load_route_reader};

    #[test]
    fn loads_shape_without_times() {
        let csv = "lat,lon\n0.0,0.0\n0.001,0.0\n0.002,0.0\n";
        let route = load_route_reader(Cursor::new(csv)).unwrap();
        assert_eq!(route.shape.len(), 3);
        assert_eq!(route.segment_travel_secs, None);
    }

    #[test]
    fn loads_travel_times() {
        let csv = "lat,lon,expected_travel_secs\n0.0,0.0,10\n0.001,0.0,12.5\n0.002,0.0,\n";
        let route = load_route_reader(Cursor::new(csv)).unwrap();
        assert_eq!(route.segment_travel_secs, Some(vec![10.0, 12.5]));
    }

    #[test]
    fn blank_time_column_means_no_table() {
        let csv = "lat,lon,expected_travel_secs\n0.0,0.0,\n0.001,0.0,\n";
        let route = load_route_reader(Cursor::new(csv)).unwrap();
        assert_eq!(route.segment_travel_secs, None);
    }

    #[test]
    fn partial_time_column_rejected() {
        let csv = "lat,lon,expected_travel_secs\n0.0,0.0,10\n0.001,0.0,\n0.002,0.0,\n";
        assert!(matches!(load_route_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }

    #[test]
    fn time_on_last_row_rejected() {
        let csv = "lat,lon,expected_travel_secs\n0.0,0.0,10\n0.001,0.0,12.5\n0.002,0.0,7\n";
        let err = load_route_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(&err, SpatialError::Parse(msg) if msg.starts_with("row 3:")), "{err}");

        let csv = "lat,lon,expected_travel_secs\n0.0,0.0,\n0.001,0.0,4\n";
        assert!(matches!(load_route_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }

    #[test]
    fn bad_coordinates_rejected() {
        let csv = "lat,lon\n95.0,0.0\n";
        assert!(matches!(load_route_reader(Cursor::new(csv)), Err(SpatialError::Coordinate(_))));

        let csv = "lat,lon\nnorth,0.0\n";
        assert!(matches!(load_route_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = crate::load_route_csv(std::path::Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(SpatialError::Io(_))));
    }
}
