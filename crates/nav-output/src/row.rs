//! Plain data row written by trace backends.

use nav_core::LocationSample;

/// One emitted location, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub timestamp_ms:          u64,
    pub lat:                   f64,
    pub lon:                   f64,
    pub course_deg:            f64,
    pub speed_mps:             f64,
    pub horizontal_accuracy_m: f64,
}

impl From<&LocationSample> for TraceRow {
    fn from(s: &LocationSample) -> Self {
        Self {
            timestamp_ms:          s.timestamp.as_millis(),
            lat:                   s.coordinate.lat,
            lon:                   s.coordinate.lon,
            course_deg:            s.course_deg,
            speed_mps:             s.speed_mps,
            horizontal_accuracy_m: s.horizontal_accuracy_m,
        }
    }
}
