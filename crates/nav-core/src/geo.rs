//! Geographic coordinate types and spherical-Earth geodesy.
//!
//! Everything here assumes a spherical Earth with radius [`EARTH_RADIUS_M`].
//! Routes never cross the poles, so no effort is made to stay numerically
//! stable there.

use crate::{NavError, NavResult};

/// Mean Earth radius used by every great-circle formula in the workspace.
pub const EARTH_RADIUS_M: f64 = 6_373_000.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`GeoPoint::new`] but rejects non-finite or out-of-range values.
    pub fn try_new(lat: f64, lon: f64) -> NavResult<Self> {
        let p = Self { lat, lon };
        if lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0 {
            Ok(p)
        } else {
            Err(NavError::InvalidCoordinate(p))
        }
    }

    #[inline]
    pub fn to_radians(self) -> RadianPoint {
        RadianPoint {
            lat: self.lat.to_radians(),
            lon: self.lon.to_radians(),
        }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let a = self.to_radians();
        let b = other.to_radians();

        let d_lat = b.lat - a.lat;
        let d_lon = b.lon - a.lon;

        let h = (d_lat * 0.5).sin().powi(2)
            + a.lat.cos() * b.lat.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
    }

    /// Initial great-circle bearing towards `other`, degrees in `[0, 360)`.
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        let a = self.to_radians();
        let b = other.to_radians();
        let d_lon = b.lon - a.lon;

        let y = d_lon.sin() * b.lat.cos();
        let x = a.lat.cos() * b.lat.sin() - a.lat.sin() * b.lat.cos() * d_lon.cos();

        wrap_degrees(y.atan2(x).to_degrees())
    }

    /// The point reached by travelling `distance_m` along the great circle
    /// that leaves `self` at `bearing_deg`.
    pub fn destination(self, distance_m: f64, bearing_deg: f64) -> GeoPoint {
        let start = self.to_radians();
        let delta = distance_m / EARTH_RADIUS_M;
        let theta = bearing_deg.to_radians();

        let lat = (start.lat.sin() * delta.cos()
            + start.lat.cos() * delta.sin() * theta.cos())
        .asin();
        let lon = start.lon
            + (theta.sin() * delta.sin() * start.lat.cos())
                .atan2(delta.cos() - start.lat.sin() * lat.sin());

        RadianPoint { lat, lon: normalize_radians(lon) }.to_degrees()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── RadianPoint ───────────────────────────────────────────────────────────────

/// A coordinate in radians.  Only used inside the geodesy formulas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadianPoint {
    pub lat: f64,
    pub lon: f64,
}

impl RadianPoint {
    #[inline]
    pub fn to_degrees(self) -> GeoPoint {
        GeoPoint {
            lat: self.lat.to_degrees(),
            lon: self.lon.to_degrees(),
        }
    }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap any angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two headings, in `[0, 180]`.
#[inline]
pub fn angular_difference(a_deg: f64, b_deg: f64) -> f64 {
    let phi = (b_deg - a_deg).abs() % 360.0;
    if phi > 180.0 { 360.0 - phi } else { phi }
}

fn normalize_radians(lon: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (lon + PI).rem_euclid(TAU) - PI
}

// ── Planar intersection ───────────────────────────────────────────────────────

/// Intersection of two finite segments, treating latitude/longitude as plain
/// Cartesian `(y, x)`.
///
/// Only meaningful over short distances; the projection engine uses it to
/// drop a perpendicular onto a route segment.  Returns `None` for parallel
/// segments or when the crossing lies outside either segment.
pub fn segment_intersection(
    first:  (GeoPoint, GeoPoint),
    second: (GeoPoint, GeoPoint),
) -> Option<GeoPoint> {
    let (a1, a2) = first;
    let (b1, b2) = second;

    let denominator = (b2.lat - b1.lat) * (a2.lon - a1.lon)
        - (b2.lon - b1.lon) * (a2.lat - a1.lat);
    if denominator == 0.0 {
        return None;
    }

    let d_start_y = a1.lat - b1.lat;
    let d_start_x = a1.lon - b1.lon;
    let ua = ((b2.lon - b1.lon) * d_start_y - (b2.lat - b1.lat) * d_start_x) / denominator;
    let ub = ((a2.lon - a1.lon) * d_start_y - (a2.lat - a1.lat) * d_start_x) / denominator;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(GeoPoint {
        lat: a1.lat + ua * (a2.lat - a1.lat),
        lon: a1.lon + ua * (a2.lon - a1.lon),
    })
}
