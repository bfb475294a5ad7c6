//! Per-vertex heading and turn-penalty annotation.
//!
//! The output is positionally aligned 1:1 with the polyline's vertices, so a
//! vertex index produced by the projection engine can index it directly.
//!
//! | Vertex           | heading               | turn penalty                               |
//! |------------------|-----------------------|--------------------------------------------|
//! | `0`              | bearing(p0, p1)       | 0 (nothing to turn from)                   |
//! | `1 ..= n-2`      | bearing(pi, pi+1)     | clamp(Δ(bearing(pi-1, pi), heading))       |
//! | `n-1`            | repeats vertex `n-2`  | repeats vertex `n-2`                       |

use nav_core::{GeoPoint, SimulationConfig, angular_difference};

use crate::Polyline;

/// A route vertex with the values the speed model needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnnotatedVertex {
    pub point:            GeoPoint,
    /// Bearing of the segment leaving this vertex, degrees in `[0, 360)`.
    pub heading:          f64,
    /// How sharply the route turns at this vertex, clamped to the band.
    pub turn_penalty:     f64,
    /// Speed assumed at this vertex before the speed model has run.
    pub speed_hint:       f64,
}

/// Clamp range for turn penalties, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TurnPenaltyBand {
    pub minimum: f64,
    pub maximum: f64,
}

impl TurnPenaltyBand {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            minimum: config.minimum_turn_penalty_deg,
            maximum: config.maximum_turn_penalty_deg,
        }
    }

    #[inline]
    pub fn clamp(&self, penalty: f64) -> f64 {
        penalty.clamp(self.minimum, self.maximum)
    }
}

impl Default for TurnPenaltyBand {
    fn default() -> Self {
        Self { minimum: 0.0, maximum: 90.0 }
    }
}

/// Annotate every vertex of `polyline`.
///
/// Returns an empty vector for an empty polyline.  A single vertex gets
/// heading 0 and penalty 0.
pub fn annotate(polyline: &Polyline, band: TurnPenaltyBand, speed_hint: f64) -> Vec<AnnotatedVertex> {
    let points = polyline.points();
    let mut out = Vec::with_capacity(points.len());

    let Some(&only) = points.first() else {
        return out;
    };
    if points.len() == 1 {
        out.push(AnnotatedVertex {
            point:        only,
            heading:      0.0,
            turn_penalty: band.clamp(0.0),
            speed_hint,
        });
        return out;
    }

    let mut incoming: Option<f64> = None;
    for pair in points.windows(2) {
        let heading = pair[0].bearing_to(pair[1]);
        let turn = incoming.map_or(0.0, |previous| angular_difference(previous, heading));
        out.push(AnnotatedVertex {
            point:        pair[0],
            heading,
            turn_penalty: band.clamp(turn),
            speed_hint,
        });
        incoming = Some(heading);
    }

    // Last vertex has no outgoing segment.
    let predecessor = out[out.len() - 1];
    out.push(AnnotatedVertex {
        point: points[points.len() - 1],
        ..predecessor
    });
    out
}
