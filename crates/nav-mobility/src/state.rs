//! Simulator state.

use nav_core::LocationSample;
use nav_spatial::{AnnotatedVertex, Polyline, RouteGeometry, TurnPenaltyBand, VertexIndex, annotate};

/// Where the simulator is in its lifecycle.
///
/// ```text
/// Uninitialized ──initialize──▶ Simulating ──end of shape──▶ Completed
///       ▲                          ▲    │                        │
///       └──────── clean_up ────────┼────┴────────────────────────┤
///                                  └──────────── reroute ────────┘
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Uninitialized,
    Simulating,
    Completed,
}

impl std::fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SimulationPhase::Uninitialized => "uninitialized",
            SimulationPhase::Simulating    => "simulating",
            SimulationPhase::Completed     => "completed",
        };
        f.write_str(s)
    }
}

/// The route currently being followed, with everything derived from it.
///
/// Built wholesale when a route is set or replaced; never mutated.
pub struct ActiveRoute {
    pub geometry:     RouteGeometry,
    /// One entry per vertex of `geometry.shape`.
    pub annotations:  Vec<AnnotatedVertex>,
    pub vertex_index: VertexIndex,
}

impl ActiveRoute {
    pub fn new(geometry: RouteGeometry, band: TurnPenaltyBand, speed_hint: f64) -> Self {
        let annotations = annotate(&geometry.shape, band, speed_hint);
        let vertex_index = VertexIndex::build(&geometry.shape);
        Self { geometry, annotations, vertex_index }
    }
}

/// Mutable per-route progress, owned exclusively by the simulator.
///
/// Invariants while a route is active:
/// - `remaining_shape` is a geometric suffix of the active route's shape
///   starting at the last emitted coordinate; between reroutes it only
///   shrinks.
/// - `current_speed` lies in the configured speed band.
/// - `current_distance_traveled` never decreases except when a reroute
///   recomputes it against the new shape.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub remaining_shape:           Polyline,
    pub current_distance_traveled: f64,
    pub current_speed:             f64,
    pub last_emitted_location:     Option<LocationSample>,
    /// Vertex matched on the previous tick.  Only narrows the next search.
    pub last_vertex_hint:          Option<usize>,
}

impl SimulationState {
    /// No route, starting speed `initial_speed`.
    pub fn idle(initial_speed: f64) -> Self {
        Self {
            remaining_shape:           Polyline::empty(),
            current_distance_traveled: 0.0,
            current_speed:             initial_speed,
            last_emitted_location:     None,
            last_vertex_hint:          None,
        }
    }
}

/// Read-only summary of the simulator, cheap to copy across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot {
    pub phase:                        SimulationPhase,
    pub remaining_length_m:           f64,
    pub distance_traveled_m:          f64,
    pub current_speed_mps:            f64,
    pub last_location:                Option<LocationSample>,
    /// Last distance reported through a progress update, if any.
    pub reported_distance_traveled_m: Option<f64>,
}
