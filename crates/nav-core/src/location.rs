//! The simulator's output record.

use crate::{GeoPoint, Timestamp};

/// One simulated location fix.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationSample {
    pub coordinate:            GeoPoint,
    /// Direction of travel, degrees in `[0, 360)`.
    pub course_deg:            f64,
    /// Always `>= 0`; exactly 0 for the seed location and at the route end.
    pub speed_mps:             f64,
    pub horizontal_accuracy_m: f64,
    pub timestamp:             Timestamp,
}

impl LocationSample {
    /// `true` for a stationary fix (seed location or terminal hold).
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.speed_mps == 0.0
    }
}
