//! CSV route loader.
//!
//! # CSV format
//!
//! One row per route vertex, in driving order:
//!
//! ```csv
//! lat,lon,expected_travel_secs
//! 37.7793,-122.4193,12.5
//! 37.7805,-122.4178,8.0
//! 37.7812,-122.4160,
//! ```
//!
//! **`expected_travel_secs`** is optional.  On row *i* it is the expected time
//! to drive segment *i → i+1*, so the last row must leave it blank.  Either
//! every segment row carries a value or none does (the column may also be
//! omitted entirely).  A partially filled column, or a value on the last row,
//! is a parse error.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::GeoPoint;

use crate::{Polyline, RouteGeometry, SpatialError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    lat:                  f64,
    lon:                  f64,
    #[serde(default)]
    expected_travel_secs: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RouteGeometry`] from a CSV file.
pub fn load_route_csv(path: &Path) -> Result<RouteGeometry, SpatialError> {
    let file = std::fs::File::open(path)
        .map_err(SpatialError::Io)?;
    load_route_reader(file)
}

/// Like [`load_route_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_route_reader<R: Read>(reader: R) -> Result<RouteGeometry, SpatialError> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut times: Vec<Option<f64>> = Vec::new();

    for (row, result) in csv_reader.deserialize::<RouteRecord>().enumerate() {
        let record = result.map_err(|e| SpatialError::Parse(format!("row {}: {e}", row + 1)))?;
        points.push(GeoPoint::try_new(record.lat, record.lon)?);
        times.push(record.expected_travel_secs);
    }

    // ── Resolve the travel-time column ────────────────────────────────────
    if let Some(Some(secs)) = times.last() {
        return Err(SpatialError::Parse(format!(
            "row {}: expected_travel_secs {secs} on the last row has no segment to cover",
            times.len()
        )));
    }

    let route = RouteGeometry::new(Polyline::new(points));
    let segment_times = &times[..times.len().saturating_sub(1)];

    if segment_times.is_empty() || segment_times.iter().all(Option::is_none) {
        return Ok(route);
    }
    let secs: Vec<f64> = segment_times
        .iter()
        .enumerate()
        .map(|(i, t)| {
            t.ok_or_else(|| {
                SpatialError::Parse(format!(
                    "row {}: expected_travel_secs missing while other segments have one",
                    i + 1
                ))
            })
        })
        .collect::<Result<_, _>>()?;

    route.with_segment_travel_times(secs)
}
