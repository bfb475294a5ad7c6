//! `RouteSimulator`: drives a simulated vehicle along a route, one tick at a
//! time.

use tracing::{debug, trace, warn};

use nav_core::{Clock, GeoPoint, LocationSample, SimulationConfig, Timestamp, checked_wall_tick_interval, wrap_degrees};
use nav_spatial::{Polyline, RouteGeometry, TurnPenaltyBand};

use crate::{
    ActiveRoute, MobilityError, MobilityResult, SimulationPhase, SimulationSnapshot,
    SimulationState, SpeedModel,
};

/// What a progress update did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Same route (or none supplied): the reported distance was recorded,
    /// nothing was re-snapped.
    Advisory,
    /// A new route was installed and the simulator re-snapped onto it.
    Rerouted,
}

/// The route-following state machine.
///
/// Exactly one owner calls every method, in order.  `nav-sim` keeps it on a
/// single task so ticks, reroutes and clean-ups are serialized.
pub struct RouteSimulator {
    config:         SimulationConfig,
    speed_model:    SpeedModel,
    band:           TurnPenaltyBand,
    route:          Option<ActiveRoute>,
    state:          SimulationState,
    phase:          SimulationPhase,
    reported_m:     Option<f64>,
    /// Survives `clean_up` so timestamps stay strictly increasing for the
    /// lifetime of the simulator.
    last_timestamp: Option<Timestamp>,
}

impl RouteSimulator {
    /// Create an uninitialized simulator.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::Config`] if `config` fails validation.
    pub fn new(config: SimulationConfig) -> MobilityResult<Self> {
        config.validate()?;
        Ok(Self {
            speed_model:    SpeedModel::from_config(&config),
            band:           TurnPenaltyBand::from_config(&config),
            state:          SimulationState::idle(config.minimum_speed_mps),
            route:          None,
            phase:          SimulationPhase::Uninitialized,
            reported_m:     None,
            last_timestamp: None,
            config,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn route(&self) -> Option<&ActiveRoute> {
        self.route.as_ref()
    }

    #[inline]
    pub fn last_location(&self) -> Option<LocationSample> {
        self.state.last_emitted_location
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            phase:                        self.phase,
            remaining_length_m:           self.state.remaining_shape.total_length(),
            distance_traveled_m:          self.state.current_distance_traveled,
            current_speed_mps:            self.state.current_speed,
            last_location:                self.state.last_emitted_location,
            reported_distance_traveled_m: self.reported_m,
        }
    }

    /// Change the wall-clock speed-up.  Distance per tick is unaffected; the
    /// caller is responsible for re-timing its tick source.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) -> MobilityResult<()> {
        checked_wall_tick_interval(self.config.tick_interval_secs, multiplier)?;
        self.config.speed_multiplier = multiplier;
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start following `route`, optionally from the projection of `start`.
    ///
    /// An empty route leaves the simulator uninitialized, so subsequent
    /// ticks are no-ops (or re-emit the configured initial location).
    pub fn initialize(&mut self, route: RouteGeometry, start: Option<GeoPoint>) {
        if route.shape.is_empty() {
            warn!("empty route ignored; simulator stays uninitialized");
            self.clean_up();
            return;
        }

        let active = ActiveRoute::new(route, self.band, self.config.minimum_speed_mps);
        let shape = &active.geometry.shape;
        let remaining = match start.and_then(|p| shape.closest_point(p, 0)) {
            Some(p) => shape.slice_by_distance(p.distance_from_start, shape.total_length()),
            None => shape.clone(),
        };

        debug!(
            vertices = shape.len(),
            length_m = shape.total_length(),
            remaining_m = remaining.total_length(),
            timed = active.geometry.segment_travel_secs.is_some(),
            "route initialized"
        );

        self.state = SimulationState {
            remaining_shape:           remaining,
            current_distance_traveled: 0.0,
            current_speed:             self.config.minimum_speed_mps,
            last_emitted_location:     self.state.last_emitted_location,
            last_vertex_hint:          None,
        };
        self.route = Some(active);
        self.phase = SimulationPhase::Simulating;
        self.reported_m = None;
    }

    /// Handle a progress notification from the navigation layer.
    ///
    /// Without a route, or with the route already being followed, the
    /// update is advisory.  A different route triggers a reroute: the last
    /// emitted location (or `location`, if given) is projected onto the new
    /// shape and simulation continues from there, so the next sample is
    /// spatially continuous with the previous one.
    ///
    /// # Errors
    ///
    /// [`MobilityError::DegenerateReroute`] if the new route has fewer than
    /// two points.  Nothing is changed in that case.
    pub fn on_progress_updated(
        &mut self,
        distance_traveled_m: f64,
        route:               Option<RouteGeometry>,
        location:            Option<GeoPoint>,
    ) -> MobilityResult<ProgressOutcome> {
        let new_route = match route {
            Some(r) if !self.is_following(&r) => r,
            _ => {
                self.reported_m = Some(distance_traveled_m);
                return Ok(ProgressOutcome::Advisory);
            }
        };

        if !new_route.is_drivable() {
            let points = new_route.shape.len();
            warn!(points, "degenerate reroute ignored");
            return Err(MobilityError::DegenerateReroute { points });
        }

        let active = ActiveRoute::new(new_route, self.band, self.config.minimum_speed_mps);
        let shape = &active.geometry.shape;
        let anchor = location
            .or(self.state.last_emitted_location.map(|s| s.coordinate))
            .or(shape.first());
        let snapped = anchor
            .and_then(|p| shape.closest_point(p, 0))
            .map_or(0.0, |p| p.distance_from_start);

        debug!(
            vertices = shape.len(),
            snapped_at_m = snapped,
            previous_traveled_m = self.state.current_distance_traveled,
            "rerouted"
        );

        self.state.remaining_shape = shape.slice_by_distance(snapped, shape.total_length());
        self.state.current_distance_traveled = snapped;
        self.state.last_vertex_hint = None;
        self.route = Some(active);
        self.phase = SimulationPhase::Simulating;
        self.reported_m = Some(distance_traveled_m);
        Ok(ProgressOutcome::Rerouted)
    }

    /// Forget the route and all progress.  Idempotent.
    pub fn clean_up(&mut self) {
        if self.phase != SimulationPhase::Uninitialized {
            debug!(phase = %self.phase, "simulation cleaned up");
        }
        self.route = None;
        self.state = SimulationState::idle(self.config.minimum_speed_mps);
        self.phase = SimulationPhase::Uninitialized;
        self.reported_m = None;
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one tick and return the location to emit, if any.
    ///
    /// - Uninitialized: re-emits `initial_location` with speed 0, or nothing.
    /// - Simulating: moves along the remaining shape.
    /// - Completed: re-emits the route's last coordinate with speed 0.
    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &mut C) -> Option<LocationSample> {
        match self.phase {
            SimulationPhase::Uninitialized => {
                let seed = self.config.initial_location?;
                return Some(self.stamp(seed, 0.0, 0.0, clock));
            }
            SimulationPhase::Completed => return self.emit_terminal(clock),
            SimulationPhase::Simulating => {}
        }

        let route = self.route.as_ref()?;
        let remaining = &self.state.remaining_shape;
        let tick_distance = self.state.current_speed * self.config.tick_interval_secs;

        let Some(coordinate) = remaining.advance(tick_distance) else {
            return self.finish(clock);
        };

        let vertex = self.nearest_vertex(route, coordinate);
        let annotation = route.annotations[vertex];
        let distance_to_vertex = coordinate.distance_m(annotation.point);
        let nearby = remaining.trimmed(tick_distance, self.config.nearby_window_m).len();

        let speed = match route.geometry.expected_segment_speed(vertex) {
            Some(expected) => self.speed_model.clamp(expected),
            None => self.speed_model.speed(distance_to_vertex, nearby, annotation.turn_penalty),
        };

        let ahead = remaining
            .advance(tick_distance + self.config.course_lookahead_m)
            .or(remaining.last());
        let course = match ahead {
            Some(p) if p != coordinate => coordinate.bearing_to(p),
            _ => self.last_course().unwrap_or(annotation.heading),
        };

        let rest = remaining.slice_by_distance(tick_distance, remaining.total_length());

        trace!(
            vertex,
            distance_to_vertex_m = distance_to_vertex,
            nearby,
            penalty = annotation.turn_penalty,
            speed_mps = speed,
            remaining_m = rest.total_length(),
            "tick"
        );

        self.state.remaining_shape = rest;
        self.state.current_distance_traveled += tick_distance;
        self.state.current_speed = speed;
        self.state.last_vertex_hint = Some(vertex);
        Some(self.stamp(coordinate, course, speed, clock))
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn is_following(&self, route: &RouteGeometry) -> bool {
        self.route.as_ref().is_some_and(|r| r.geometry == *route)
    }

    /// Closest original-route vertex to `p`.  Narrows the search with the
    /// previous tick's vertex when there is one; otherwise asks the R-tree.
    fn nearest_vertex(&self, route: &ActiveRoute, p: GeoPoint) -> usize {
        let found = match self.state.last_vertex_hint {
            Some(hint) => route
                .geometry
                .shape
                .closest_point(p, hint.saturating_sub(1))
                .map(|r| r.segment_index),
            None => route.vertex_index.nearest(p),
        };
        found.unwrap_or(0).min(route.annotations.len().saturating_sub(1))
    }

    fn last_course(&self) -> Option<f64> {
        self.state.last_emitted_location.map(|s| s.course_deg)
    }

    /// The shape ran out: jump to its end and switch to `Completed`.
    fn finish<C: Clock + ?Sized>(&mut self, clock: &mut C) -> Option<LocationSample> {
        let route = self.route.as_ref()?;
        let end = route.geometry.shape.last()?;
        let last_vertex = route.annotations.len().saturating_sub(1);

        self.state.current_distance_traveled += self.state.remaining_shape.total_length();
        self.state.remaining_shape = Polyline::new(vec![end]);
        self.state.last_vertex_hint = Some(last_vertex);
        self.phase = SimulationPhase::Completed;

        debug!(
            distance_traveled_m = self.state.current_distance_traveled,
            "route complete"
        );
        self.emit_terminal(clock)
    }

    fn emit_terminal<C: Clock + ?Sized>(&mut self, clock: &mut C) -> Option<LocationSample> {
        let route = self.route.as_ref()?;
        let end = route.geometry.shape.last()?;
        let heading = route.annotations.last().map_or(0.0, |a| a.heading);
        let course = self.last_course().unwrap_or(heading);
        Some(self.stamp(end, course, 0.0, clock))
    }

    /// Build the sample, forcing strictly increasing timestamps, and record
    /// it as the last emitted location.
    fn stamp<C: Clock + ?Sized>(
        &mut self,
        coordinate: GeoPoint,
        course_deg: f64,
        speed_mps:  f64,
        clock:      &mut C,
    ) -> LocationSample {
        let mut timestamp = clock.now();
        if let Some(previous) = self.last_timestamp {
            if timestamp <= previous {
                timestamp = previous.next();
            }
        }
        self.last_timestamp = Some(timestamp);

        let sample = LocationSample {
            coordinate,
            course_deg:            wrap_degrees(course_deg),
            speed_mps,
            horizontal_accuracy_m: self.config.horizontal_accuracy_m,
            timestamp,
        };
        self.state.last_emitted_location = Some(sample);
        sample
    }
}
