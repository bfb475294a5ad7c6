//! `nav-mobility`: the route-following simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`speed`]     | `SpeedModel`: distance / density / turn penalty → speed          |
//! | [`state`]     | `SimulationState`, `SimulationPhase`, `ActiveRoute`, `SimulationSnapshot` |
//! | [`simulator`] | `RouteSimulator`: initialize, tick, reroute, clean up           |
//! | [`error`]     | `MobilityError`, `MobilityResult<T>`                             |
//!
//! # Movement model
//!
//! The simulator is a synchronous state machine; something else decides
//! when to call [`RouteSimulator::tick`] (`nav-sim` drives it from a timer).
//! Each tick:
//!
//! 1. Moves `current_speed × tick_interval` metres along the remaining shape.
//! 2. Looks up the nearest route vertex for its turn penalty.
//! 3. Picks the speed for the *next* tick: from the expected segment travel
//!    time when the route has one, otherwise from [`SpeedModel`].
//! 4. Emits a [`LocationSample`][nav_core::LocationSample] and cuts the
//!    remaining shape at the new position.
//!
//! Past the end of the route it holds the last coordinate with speed 0.

pub mod error;
pub mod simulator;
pub mod speed;
pub mod state;


pub use error::{MobilityError, MobilityResult};
pub use simulator::{ProgressOutcome, RouteSimulator};
pub use speed::SpeedModel;
pub use state::{ActiveRoute, SimulationPhase, SimulationSnapshot, SimulationState};
