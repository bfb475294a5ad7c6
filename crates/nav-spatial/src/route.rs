//! `RouteGeometry`: the shape the simulator follows plus optional timing.

use crate::{Polyline, SpatialError, SpatialResult};

/// A route shape with optional expected travel times per segment.
///
/// When present, `segment_travel_secs[i]` is the expected time to drive from
/// vertex `i` to vertex `i + 1`, so the table is exactly one shorter than the
/// shape.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RouteGeometry {
    pub shape:               Polyline,
    pub segment_travel_secs: Option<Vec<f64>>,
}

impl RouteGeometry {
    pub fn new(shape: Polyline) -> Self {
        Self { shape, segment_travel_secs: None }
    }

    /// Attach an expected-travel-time table.
    ///
    /// # Errors
    ///
    /// The table must have one entry per segment and every entry must be
    /// finite and positive.
    pub fn with_segment_travel_times(mut self, secs: Vec<f64>) -> SpatialResult<Self> {
        let expected = self.shape.len().saturating_sub(1);
        if secs.len() != expected {
            return Err(SpatialError::TravelTimeCount { expected, got: secs.len() });
        }
        if let Some((index, &bad)) = secs
            .iter()
            .enumerate()
            .find(|&(_, &s)| !(s.is_finite() && s > 0.0))
        {
            return Err(SpatialError::TravelTime { index, secs: bad });
        }
        self.segment_travel_secs = Some(secs);
        Ok(self)
    }

    /// A route the simulator can make progress on.
    #[inline]
    pub fn is_drivable(&self) -> bool {
        self.shape.len() >= 2
    }

    /// `segment length / expected travel time` for the segment leaving
    /// vertex `index`, if the table covers it.
    pub fn expected_segment_speed(&self, index: usize) -> Option<f64> {
        let secs = *self.segment_travel_secs.as_ref()?.get(index)?;
        let length = self.shape.segment_length(index)?;
        Some(length / secs)
    }
}

impl From<Polyline> for RouteGeometry {
    fn from(shape: Polyline) -> Self {
        RouteGeometry::new(shape)
    }
}
