//! Simulation configuration.
//!
//! Typically built from `SimulationConfig::default()` and a handful of field
//! overrides, or loaded from a JSON file by the application crate (enable the
//! `serde` feature; missing fields fall back to their defaults).

use std::time::Duration;

use crate::{GeoPoint, NavError, NavResult};

/// Every tunable of the route simulator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Divides the wall-clock tick period.  `2.0` emits twice as many
    /// locations per second; the distance covered per tick is unchanged.
    /// Must be finite and `> 0`.
    pub speed_multiplier: f64,

    /// Nominal simulated seconds per tick.  Also the wall-clock period at a
    /// multiplier of 1.  Default: 1.0.
    pub tick_interval_secs: f64,

    /// Scheduling leeway the tick timer tolerates before a firing is
    /// reported as late.  Default: 50 ms.
    pub tick_accuracy_ms: u64,

    /// Lower speed bound (≈ 21 km/h).
    pub minimum_speed_mps: f64,

    /// Upper speed bound (≈ 108 km/h).
    pub maximum_speed_mps: f64,

    /// Beyond this distance from the nearest route vertex the vehicle drives
    /// at `maximum_speed_mps`.
    pub safe_distance_m: f64,

    pub minimum_turn_penalty_deg: f64,
    pub maximum_turn_penalty_deg: f64,

    /// Vertex count inside the `nearby_window_m` lookahead at which the shape
    /// is treated as a roundabout and the vehicle slows to the minimum.
    pub dense_vertex_threshold: usize,

    /// Length of the lookahead window used for the vertex-density check.
    pub nearby_window_m: f64,

    /// Course is the bearing towards the point this far past the new
    /// position.
    pub course_lookahead_m: f64,

    /// Reported on every emitted sample.
    pub horizontal_accuracy_m: f64,

    /// Emitted verbatim (speed 0) on every tick until a route is set.
    pub initial_location: Option<GeoPoint>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_multiplier:         1.0,
            tick_interval_secs:       1.0,
            tick_accuracy_ms:         50,
            minimum_speed_mps:        6.0,
            maximum_speed_mps:        30.0,
            safe_distance_m:          50.0,
            minimum_turn_penalty_deg: 0.0,
            maximum_turn_penalty_deg: 90.0,
            dense_vertex_threshold:   10,
            nearby_window_m:          100.0,
            course_lookahead_m:       10.0,
            horizontal_accuracy_m:    5.0,
            initial_location:         None,
        }
    }
}

impl SimulationConfig {
    /// Reject configurations the simulator cannot honour.
    pub fn validate(&self) -> NavResult<()> {
        validate_speed_multiplier(self.speed_multiplier)?;
        if !(self.tick_interval_secs.is_finite() && self.tick_interval_secs > 0.0) {
            return Err(NavError::Config(format!(
                "tick_interval_secs must be positive, got {}",
                self.tick_interval_secs
            )));
        }
        checked_wall_tick_interval(self.tick_interval_secs, self.speed_multiplier)?;
        if !(self.minimum_speed_mps > 0.0 && self.minimum_speed_mps <= self.maximum_speed_mps)
            || !self.maximum_speed_mps.is_finite()
        {
            return Err(NavError::Config(format!(
                "speed band [{}, {}] m/s is invalid",
                self.minimum_speed_mps, self.maximum_speed_mps
            )));
        }
        if !(self.safe_distance_m >= 0.0) {
            return Err(NavError::Config(format!(
                "safe_distance_m must be non-negative, got {}",
                self.safe_distance_m
            )));
        }
        if !(self.minimum_turn_penalty_deg >= 0.0
            && self.minimum_turn_penalty_deg < self.maximum_turn_penalty_deg
            && self.maximum_turn_penalty_deg <= 180.0)
        {
            return Err(NavError::Config(format!(
                "turn penalty band [{}, {}] deg is invalid",
                self.minimum_turn_penalty_deg, self.maximum_turn_penalty_deg
            )));
        }
        if let Some(p) = self.initial_location {
            GeoPoint::try_new(p.lat, p.lon)?;
        }
        Ok(())
    }

    /// Wall-clock period between ticks: `tick_interval / speed_multiplier`.
    ///
    /// Saturates at [`MAX_WALL_TICK_INTERVAL`] for a configuration that
    /// would fail [`validate`](Self::validate).
    pub fn wall_tick_interval(&self) -> Duration {
        checked_wall_tick_interval(self.tick_interval_secs, self.speed_multiplier)
            .unwrap_or(MAX_WALL_TICK_INTERVAL)
    }

    #[inline]
    pub fn tick_accuracy(&self) -> Duration {
        Duration::from_millis(self.tick_accuracy_ms)
    }
}

/// Longest wall-clock tick period accepted (one day).
pub const MAX_WALL_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// `tick_interval_secs / multiplier` as a `Duration`, for runtime multiplier
/// changes.  Fails for a bad multiplier or a period longer than
/// [`MAX_WALL_TICK_INTERVAL`].
pub fn checked_wall_tick_interval(tick_interval_secs: f64, multiplier: f64) -> NavResult<Duration> {
    validate_speed_multiplier(multiplier)?;
    Duration::try_from_secs_f64(tick_interval_secs / multiplier)
        .ok()
        .filter(|period| *period <= MAX_WALL_TICK_INTERVAL)
        .ok_or_else(|| {
            NavError::Config(format!(
                "tick period {tick_interval_secs} s / {multiplier} is longer than {} s",
                MAX_WALL_TICK_INTERVAL.as_secs()
            ))
        })
}

/// The multiplier precondition on its own.
pub fn validate_speed_multiplier(multiplier: f64) -> NavResult<()> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(())
    } else {
        Err(NavError::Config(format!(
            "speed_multiplier must be finite and > 0, got {multiplier}"
        )))
    }
}
