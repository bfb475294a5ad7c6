//! Built-in demo route through a synthetic Atlanta street grid.
//!
//! Four blocks east, half a lap round a roundabout, three blocks north,
//! then one block west.
//!
//! Blocks are ~310 m N-S and ~280 m E-W.  The arc packs a dozen vertices
//! into ~80 m so the vehicle slows right down through it.

use nav_core::GeoPoint;
use nav_spatial::{Polyline, RouteGeometry};

const LAT_START: f64 = 33.7490;
const LON_START: f64 = -84.3880;
const LAT_BLOCK: f64 = 0.0028;
const LON_BLOCK: f64 = 0.0030;

/// Radius of the roundabout arc, in metres.
const ARC_RADIUS_M: f64 = 25.0;
const ARC_POINTS: usize = 12;

pub fn sample_route() -> RouteGeometry {
    let mut points = Vec::new();

    // East along the southern street.
    for col in 0..=4 {
        points.push(GeoPoint::new(LAT_START, LON_START + col as f64 * LON_BLOCK));
    }

    // Half a lap around a roundabout: in from the west, out to the north.
    let entry = points[points.len() - 1];
    let centre = entry.destination(ARC_RADIUS_M, 0.0);
    for i in 1..=ARC_POINTS {
        let bearing = 180.0 - 180.0 * i as f64 / ARC_POINTS as f64;
        points.push(centre.destination(ARC_RADIUS_M, bearing));
    }

    // North up the avenue, then back west one block.
    let exit = points[points.len() - 1];
    for row in 1..=3 {
        points.push(GeoPoint::new(exit.lat + row as f64 * LAT_BLOCK, exit.lon));
    }
    let corner = points[points.len() - 1];
    points.push(GeoPoint::new(corner.lat, corner.lon - LON_BLOCK));

    RouteGeometry::new(Polyline::new(points))
}
