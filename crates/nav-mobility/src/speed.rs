//! Instantaneous speed from local route geometry.

use nav_core::SimulationConfig;

/// Maps (distance to nearest vertex, nearby vertex count, turn penalty) to a
/// speed inside `[minimum_mps, maximum_mps]`.
///
/// Three rules, evaluated in order:
///
/// 1. `nearby_points >= dense_vertex_threshold`: a tight cluster of
///    vertices (roundabout or similar) → `minimum_mps`.
/// 2. `distance >= safe_distance_m`: nothing to slow down for →
///    `maximum_mps`.
/// 3. Otherwise scale the reversed penalty `max_penalty - penalty` linearly
///    from `[min_penalty, max_penalty]` onto `[minimum_mps, maximum_mps]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedModel {
    pub minimum_mps:            f64,
    pub maximum_mps:            f64,
    pub safe_distance_m:        f64,
    pub minimum_turn_penalty:   f64,
    pub maximum_turn_penalty:   f64,
    pub dense_vertex_threshold: usize,
}

impl SpeedModel {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            minimum_mps:            config.minimum_speed_mps,
            maximum_mps:            config.maximum_speed_mps,
            safe_distance_m:        config.safe_distance_m,
            minimum_turn_penalty:   config.minimum_turn_penalty_deg,
            maximum_turn_penalty:   config.maximum_turn_penalty_deg,
            dense_vertex_threshold: config.dense_vertex_threshold,
        }
    }

    pub fn speed(&self, distance_to_vertex_m: f64, nearby_points: usize, turn_penalty: f64) -> f64 {
        if nearby_points >= self.dense_vertex_threshold {
            return self.minimum_mps;
        }
        if distance_to_vertex_m >= self.safe_distance_m {
            return self.maximum_mps;
        }

        let penalty = turn_penalty.clamp(self.minimum_turn_penalty, self.maximum_turn_penalty);
        let reversed = self.maximum_turn_penalty - penalty;
        let fraction = (reversed - self.minimum_turn_penalty)
            / (self.maximum_turn_penalty - self.minimum_turn_penalty);
        self.clamp(self.minimum_mps + fraction * (self.maximum_mps - self.minimum_mps))
    }

    #[inline]
    pub fn clamp(&self, speed_mps: f64) -> f64 {
        speed_mps.clamp(self.minimum_mps, self.maximum_mps)
    }
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
